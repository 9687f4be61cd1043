use thiserror::Error;

/// Failure of a single hand-off to an ingestion sink.
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("Ingestion endpoint rejected record: HTTP {status} - {body}")]
    Rejected { status: u16, body: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Ingestion request timed out")]
    Timeout,
}

impl SinkError {
    pub fn status(&self) -> Option<u16> {
        match self {
            SinkError::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}
