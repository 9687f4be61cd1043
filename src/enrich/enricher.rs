use super::provenance::ResourceProvenanceResolver;
use crate::domain::LogSource;
use serde_json::{Map, Value};
use tracing::warn;

/// Value written to every record's `log_type` field.
pub const LOG_TYPE: &str = "azure_log";

/// Attaches ingestion metadata and provenance to records before they are sent.
#[derive(Debug, Clone, Default)]
pub struct RecordEnricher {
    resolver: ResourceProvenanceResolver,
}

impl RecordEnricher {
    pub fn new() -> Self {
        Self {
            resolver: ResourceProvenanceResolver::new(),
        }
    }

    /// Enrich a record in place, stamping it with the current wall-clock time.
    pub fn enrich(&self, record: &mut Value, source: LogSource) {
        let ingest_timestamp = chrono::Utc::now().timestamp_millis();
        self.enrich_at(record, source, ingest_timestamp);
    }

    /// Enrich with an explicit `ingest_timestamp` (milliseconds since epoch).
    ///
    /// Objects are enriched, arrays have each object element enriched, and
    /// anything else is left as is.
    pub fn enrich_at(&self, record: &mut Value, source: LogSource, ingest_timestamp: i64) {
        match record {
            Value::Object(map) => self.enrich_object(map, source, ingest_timestamp),
            Value::Array(items) => {
                for item in items.iter_mut() {
                    if let Value::Object(map) = item {
                        self.enrich_object(map, source, ingest_timestamp);
                    }
                }
            }
            _ => {}
        }
    }

    fn enrich_object(&self, record: &mut Map<String, Value>, source: LogSource, ingest_timestamp: i64) {
        match self.resolver.resolve_record(record) {
            Ok(provenance) => provenance.apply(record),
            Err(e) => warn!(error = %e, logsource = %source, "Record provenance left unset"),
        }

        record.insert("ingest_timestamp".to_string(), Value::from(ingest_timestamp));
        record.insert("log_type".to_string(), Value::String(LOG_TYPE.to_string()));
        record.insert("logsource".to_string(), Value::String(source.as_str().to_string()));
    }
}
