use super::flatten::{flatten_json, shorten_key};
use crate::domain::LogRecord;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

const TIMESTAMP_FIELD: &str = "timestamp";

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("JSON parse error: {0}")]
    JsonError(#[from] simd_json::Error),
}

/// Turns one raw chunk (a JSON document or one NDJSON line) into a flat record.
#[derive(Debug, Clone, Default)]
pub struct RecordParser {}

impl RecordParser {
    pub fn new() -> Self {
        Self {}
    }

    /// Parse a chunk, yielding an empty record when it is not valid JSON.
    pub fn parse(&self, chunk: &str) -> LogRecord {
        match self.try_parse(chunk) {
            Ok(record) => record,
            Err(e) => {
                debug!(error = %e, chunk_len = chunk.len(), "Discarding malformed log chunk");
                LogRecord::new()
            }
        }
    }

    pub fn try_parse(&self, chunk: &str) -> Result<LogRecord, ParseError> {
        // SIMD-JSON parses in place
        let mut data = chunk.as_bytes().to_vec();
        let json: Value = simd_json::serde::from_slice(&mut data)?;
        Ok(self.normalize(&json))
    }

    /// Flatten an already-decoded document and merge leaves that shorten to
    /// the same key.
    pub fn normalize(&self, json: &Value) -> LogRecord {
        let mut record = LogRecord::new();

        for (path, value) in flatten_json(json) {
            if value.is_null() {
                continue;
            }

            let value = if path == TIMESTAMP_FIELD {
                normalize_timestamp(value)
            } else {
                value
            };

            let key = shorten_key(&path);
            let value = match record.get(&key) {
                Some(previous) => Value::String(format!("{} {}", text_of(previous), text_of(&value))),
                None => value,
            };
            record.insert(key, value);
        }

        record
    }
}

/// Replace a textual integer timestamp with its numeric value.
///
/// Zero and non-integer text keep the original string.
fn normalize_timestamp(value: Value) -> Value {
    let Value::String(text) = &value else {
        return value;
    };

    match text.trim().parse::<i64>() {
        Ok(epoch) if epoch != 0 => Value::from(epoch),
        _ => value,
    }
}

fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_flat_object() {
        let parser = RecordParser::new();
        let record = parser.parse(r#"{"level":"info","count":3}"#);

        assert_eq!(record.get("level"), Some(&json!("info")));
        assert_eq!(record.get("count"), Some(&json!(3)));
    }

    #[test]
    fn test_parse_nested_object_is_flattened() {
        let parser = RecordParser::new();
        let record = parser.parse(r#"{"properties":{"status":"Succeeded","code":200}}"#);

        assert_eq!(record.get("properties_status"), Some(&json!("Succeeded")));
        assert_eq!(record.get("properties_code"), Some(&json!(200)));
        assert!(!record.contains_key("properties"));
    }

    #[test]
    fn test_parse_malformed_yields_empty_record() {
        let parser = RecordParser::new();
        assert!(parser.parse(r#"{"log":"test""#).is_empty());
        assert!(parser.parse("not json at all").is_empty());
        assert!(parser.parse("").is_empty());
    }

    #[test]
    fn test_try_parse_reports_json_error() {
        let parser = RecordParser::new();
        let result = parser.try_parse("{");
        assert!(matches!(result, Err(ParseError::JsonError(_))));
    }

    #[test]
    fn test_duplicate_short_keys_merge_in_discovery_order() {
        let parser = RecordParser::new();
        let record = parser.parse(r#"{"a.b":"first","a":{"b":"second"}}"#);

        assert_eq!(record.len(), 1);
        assert_eq!(record.get("a_b"), Some(&json!("first second")));
    }

    #[test]
    fn test_merge_stringifies_non_string_values() {
        let parser = RecordParser::new();
        let record = parser.parse(r#"{"n-1":1,"n_1":true}"#);

        assert_eq!(record.get("n_1"), Some(&json!("1 true")));
    }

    #[test]
    fn test_merged_key_keeps_first_position() {
        let parser = RecordParser::new();
        let record = parser.parse(r#"{"x.y":"1","z":"2","x_y":"3"}"#);

        let keys: Vec<&String> = record.keys().collect();
        assert_eq!(keys, vec!["x_y", "z"]);
        assert_eq!(record.get("x_y"), Some(&json!("1 3")));
    }

    #[test]
    fn test_null_values_are_dropped() {
        let parser = RecordParser::new();
        let record = parser.parse(r#"{"a":null,"b":{"c":null},"d":"kept"}"#);

        assert!(!record.contains_key("a"));
        assert!(!record.contains_key("b_c"));
        assert_eq!(record.get("d"), Some(&json!("kept")));
    }

    #[test]
    fn test_null_does_not_merge_into_existing_key() {
        let parser = RecordParser::new();
        let record = parser.parse(r#"{"k.v":"one","k_v":null}"#);

        assert_eq!(record.get("k_v"), Some(&json!("one")));
    }

    #[test]
    fn test_numeric_timestamp_string_becomes_number() {
        let parser = RecordParser::new();
        let record = parser.parse(r#"{"timestamp":"1700000000"}"#);

        assert_eq!(record.get("timestamp"), Some(&json!(1_700_000_000_i64)));
    }

    #[test]
    fn test_non_numeric_timestamp_is_preserved() {
        let parser = RecordParser::new();

        let record = parser.parse(r#"{"timestamp":"not-a-number"}"#);
        assert_eq!(record.get("timestamp"), Some(&json!("not-a-number")));

        let record = parser.parse(r#"{"timestamp":"2024-01-01T00:00:00Z"}"#);
        assert_eq!(record.get("timestamp"), Some(&json!("2024-01-01T00:00:00Z")));
    }

    #[test]
    fn test_zero_timestamp_keeps_string() {
        let parser = RecordParser::new();
        let record = parser.parse(r#"{"timestamp":"0"}"#);

        assert_eq!(record.get("timestamp"), Some(&json!("0")));
    }

    #[test]
    fn test_numeric_timestamp_is_untouched() {
        let parser = RecordParser::new();
        let record = parser.parse(r#"{"timestamp":1700000000}"#);

        assert_eq!(record.get("timestamp"), Some(&json!(1_700_000_000_i64)));
    }

    #[test]
    fn test_nested_timestamp_is_not_normalized() {
        let parser = RecordParser::new();
        let record = parser.parse(r#"{"meta":{"timestamp":"1700000000"}}"#);

        assert_eq!(record.get("meta_timestamp"), Some(&json!("1700000000")));
    }
}
