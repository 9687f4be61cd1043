pub mod enricher;
pub mod provenance;

pub use enricher::{LOG_TYPE, RecordEnricher};
pub use provenance::{ACTIVITY_CATEGORIES, Provenance, ProvenanceError, ResourceProvenanceResolver};
