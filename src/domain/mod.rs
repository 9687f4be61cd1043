//! Domain layer for azure-log-forwarder.
//!
//! Contains the canonical types shared across all modules:
//! - `LogRecord`: flattened record produced by the parser
//! - `LogSource`: the channel a record arrived through
//! - `TriggerKind`: trigger binding type declared by the function descriptor
//! - `SinkError`: failure reported by an ingestion sink

pub mod error;
pub mod log_record;
pub mod log_source;
pub mod trigger_kind;

pub use error::SinkError;
pub use log_record::LogRecord;
pub use log_source::LogSource;
pub use trigger_kind::TriggerKind;
