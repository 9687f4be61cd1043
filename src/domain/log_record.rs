use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A flattened log record: leaf keys mapped to JSON scalars, in discovery order.
///
/// Produced fresh for each raw chunk by the parser. Enrichment works on the
/// JSON object form (`Value::Object`), so records converted with `into_value`
/// can be treated the same way as pre-structured records from a batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogRecord(Map<String, Value>);

impl LogRecord {
    pub fn new() -> Self {
        Self(Map::new())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: String, value: Value) -> Option<Value> {
        self.0.insert(key, value)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<Map<String, Value>> for LogRecord {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<LogRecord> for Value {
    fn from(record: LogRecord) -> Self {
        record.into_value()
    }
}
