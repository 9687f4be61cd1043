use super::{BatchDispatcher, DispatchError, DispatchSummary};
use crate::domain::LogSource;
use serde_json::Value;
use tracing::{info, warn};

/// Unpack an Event Hub binding value into its envelopes.
///
/// The host may deliver the batch as an array, a single envelope, or JSON text
/// encoding either of those.
pub fn envelopes_from_binding(value: Value) -> Vec<Value> {
    match value {
        Value::Null => Vec::new(),
        Value::Array(envelopes) => envelopes,
        Value::String(text) => match serde_json::from_str::<Value>(&text) {
            Ok(Value::Array(envelopes)) => envelopes,
            Ok(envelope @ Value::Object(_)) => vec![envelope],
            _ => vec![Value::String(text)],
        },
        envelope => vec![envelope],
    }
}

fn decode_envelope(envelope: Value) -> Option<Value> {
    match envelope {
        Value::String(text) => serde_json::from_str(&text).ok(),
        other => Some(other),
    }
}

impl BatchDispatcher {
    /// Process one Event Hub batch of `{"records": [...]}` envelopes.
    pub async fn dispatch_event_hub(
        &self,
        envelopes: Vec<Value>,
    ) -> Result<DispatchSummary, DispatchError> {
        info!(envelopes = envelopes.len(), "Dispatching event hub batch");

        let mut summary = DispatchSummary::default();
        let mut index = 0;

        for (envelope_no, envelope) in envelopes.into_iter().enumerate() {
            let records = match decode_envelope(envelope)
                .as_mut()
                .and_then(|envelope| envelope.get_mut("records"))
                .map(Value::take)
            {
                Some(Value::Array(records)) => records,
                _ => {
                    warn!(envelope_no, "Skipping envelope without a records array");
                    continue;
                }
            };

            for record in records {
                self.forward(record, LogSource::EventHub, index, &mut summary)
                    .await?;
                index += 1;
            }
        }

        summary.finish()
    }
}
