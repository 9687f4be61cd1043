pub mod flatten;
pub mod record;

pub use flatten::{MAX_KEY_LENGTH, flatten_json, shorten_key};
pub use record::{ParseError, RecordParser};
