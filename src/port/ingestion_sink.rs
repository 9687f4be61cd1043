use crate::domain::SinkError;
use std::future::Future;
use std::pin::Pin;

/// Destination for normalized records, one serialized record per call.
pub trait IngestionSink: Send + Sync {
    fn post_data_to_stream(
        &self,
        payload: String,
    ) -> Pin<Box<dyn Future<Output = Result<(), SinkError>> + Send + '_>>;
}
