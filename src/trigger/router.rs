use crate::dispatch::{BatchDispatcher, DispatchError, DispatchSummary, envelopes_from_binding};
use crate::domain::TriggerKind;
use crate::port::IngestionSink;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Routes an invocation payload to the dispatcher for its trigger kind.
#[derive(Debug, Clone)]
pub struct TriggerRouter {
    dispatcher: BatchDispatcher,
}

impl TriggerRouter {
    pub fn new(sink: Arc<dyn IngestionSink>) -> Self {
        Self {
            dispatcher: BatchDispatcher::new(sink),
        }
    }

    pub fn dispatcher(&self) -> &BatchDispatcher {
        &self.dispatcher
    }

    /// Dispatch `payload` according to `kind`.
    ///
    /// Returns `Ok(None)` for trigger kinds this forwarder does not handle.
    pub async fn route(
        &self,
        kind: &TriggerKind,
        payload: Value,
    ) -> Result<Option<DispatchSummary>, DispatchError> {
        match kind {
            TriggerKind::Blob => self.dispatcher.dispatch_blob(payload).await.map(Some),
            TriggerKind::EventHub => self
                .dispatcher
                .dispatch_event_hub(envelopes_from_binding(payload))
                .await
                .map(Some),
            TriggerKind::Other(name) => {
                debug!(trigger = %name, "Ignoring unsupported trigger type");
                Ok(None)
            }
        }
    }
}
