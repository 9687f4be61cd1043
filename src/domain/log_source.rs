use serde::{Deserialize, Serialize};
use std::fmt;

/// Channel a record was received through, written to the `logsource` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogSource {
    EventHub,
    BlobStorage,
}

impl LogSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogSource::EventHub => "event_hub",
            LogSource::BlobStorage => "blob_storage",
        }
    }
}

impl fmt::Display for LogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
