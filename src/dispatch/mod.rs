//! Trigger-specific batch dispatch.
//!
//! A dispatcher walks the raw records of one invocation, enriches each one,
//! serializes it and hands it to the ingestion sink. Every send is awaited
//! before the next record is processed.

pub mod blob;
pub mod event_hub;

pub use blob::BlobPayload;
pub use event_hub::envelopes_from_binding;

use crate::domain::LogSource;
use crate::enrich::RecordEnricher;
use crate::parser::RecordParser;
use crate::port::IngestionSink;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("JSON blob does not have log records (record {index} is missing). Skip processing the blob.")]
    MissingRecord { index: usize },

    #[error("Failed to serialize record {index}: {source}")]
    Serialization {
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("{failed} of {processed} records could not be delivered")]
    Delivery { failed: usize, processed: usize },
}

/// Per-invocation delivery counters.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DispatchSummary {
    pub processed: usize,
    pub delivered: usize,
    pub failed: usize,
}

impl DispatchSummary {
    /// Turn undelivered records into an invocation failure.
    fn finish(self) -> Result<Self, DispatchError> {
        if self.failed > 0 {
            Err(DispatchError::Delivery {
                failed: self.failed,
                processed: self.processed,
            })
        } else {
            Ok(self)
        }
    }
}

#[derive(Clone)]
pub struct BatchDispatcher {
    sink: Arc<dyn IngestionSink>,
    parser: RecordParser,
    enricher: RecordEnricher,
}

impl BatchDispatcher {
    pub fn new(sink: Arc<dyn IngestionSink>) -> Self {
        Self {
            sink,
            parser: RecordParser::new(),
            enricher: RecordEnricher::new(),
        }
    }

    /// Enrich, serialize and send one record.
    ///
    /// A null slot aborts the batch. Sink failures are counted and the batch
    /// continues.
    async fn forward(
        &self,
        mut record: Value,
        source: LogSource,
        index: usize,
        summary: &mut DispatchSummary,
    ) -> Result<(), DispatchError> {
        if record.is_null() {
            return Err(DispatchError::MissingRecord { index });
        }

        self.enricher.enrich(&mut record, source);
        let payload = serde_json::to_string(&record)
            .map_err(|source| DispatchError::Serialization { index, source })?;

        summary.processed += 1;
        match self.sink.post_data_to_stream(payload).await {
            Ok(()) => summary.delivered += 1,
            Err(e) => {
                warn!(index, status = ?e.status(), error = %e, logsource = %source, "Failed to deliver record");
                summary.failed += 1;
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for BatchDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchDispatcher")
            .field("parser", &self.parser)
            .field("enricher", &self.enricher)
            .finish_non_exhaustive()
    }
}
