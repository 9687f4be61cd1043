use super::{BatchDispatcher, DispatchError, DispatchSummary};
use crate::domain::LogSource;
use bytes::Bytes;
use serde_json::Value;
use tracing::{debug, info, warn};

/// Raw content delivered by a blob trigger.
#[derive(Debug, Clone, PartialEq)]
pub enum BlobPayload {
    Text(String),
    Bytes(Bytes),
    Json(Value),
}

impl BlobPayload {
    /// Normalize to text: bytes are decoded as UTF-8, JSON values serialized.
    pub fn into_text(self) -> String {
        match self {
            BlobPayload::Text(text) => text,
            BlobPayload::Bytes(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            BlobPayload::Json(value) => value.to_string(),
        }
    }
}

impl From<String> for BlobPayload {
    fn from(text: String) -> Self {
        BlobPayload::Text(text)
    }
}

impl From<&str> for BlobPayload {
    fn from(text: &str) -> Self {
        BlobPayload::Text(text.to_string())
    }
}

impl From<Bytes> for BlobPayload {
    fn from(bytes: Bytes) -> Self {
        BlobPayload::Bytes(bytes)
    }
}

impl From<Vec<u8>> for BlobPayload {
    fn from(bytes: Vec<u8>) -> Self {
        BlobPayload::Bytes(Bytes::from(bytes))
    }
}

/// A binding value that is a JSON string carries the blob text itself.
impl From<Value> for BlobPayload {
    fn from(value: Value) -> Self {
        match value {
            Value::String(text) => BlobPayload::Text(text),
            other => BlobPayload::Json(other),
        }
    }
}

/// Elements of a `{"records": [...]}` document, if `text` is one.
fn records_document(text: &str) -> Option<Vec<Value>> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(mut document)) => match document.get_mut("records").map(Value::take) {
            Some(Value::Array(records)) => Some(records),
            _ => None,
        },
        _ => None,
    }
}

impl BatchDispatcher {
    /// Process one blob-trigger payload.
    pub async fn dispatch_blob(
        &self,
        payload: impl Into<BlobPayload>,
    ) -> Result<DispatchSummary, DispatchError> {
        let text = payload.into().into_text();
        let records = self.blob_records(&text);
        info!(records = records.len(), "Dispatching blob payload");

        let mut summary = DispatchSummary::default();
        for (index, record) in records.into_iter().enumerate() {
            self.forward(record, LogSource::BlobStorage, index, &mut summary)
                .await?;
        }

        summary.finish()
    }

    /// Split blob text into raw records.
    ///
    /// A first line holding a `records` document switches to document mode,
    /// where every line that is such a document contributes its elements.
    /// Otherwise each non-blank line is one NDJSON record, unless the whole
    /// payload is a single pretty-printed `records` document.
    pub fn blob_records(&self, text: &str) -> Vec<Value> {
        let trimmed = text.trim();
        let lines: Vec<&str> = trimmed.split('\n').collect();

        if let Some(mut records) = lines.first().and_then(|line| records_document(line)) {
            for (line_no, line) in lines.iter().enumerate().skip(1) {
                if line.trim().is_empty() {
                    continue;
                }
                match records_document(line) {
                    Some(more) => records.extend(more),
                    None => warn!(line_no, "Skipping blob line that is not a records document"),
                }
            }
            return records;
        }

        if lines.len() > 1
            && let Some(records) = records_document(trimmed)
        {
            debug!("Blob payload is a multi-line records document");
            return records;
        }

        lines
            .into_iter()
            .filter(|line| !line.trim().is_empty())
            .map(|line| self.parser.parse(line).into_value())
            .collect()
    }
}
