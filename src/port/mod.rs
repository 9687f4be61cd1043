pub mod ingestion_sink;

pub use ingestion_sink::IngestionSink;
