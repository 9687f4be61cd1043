use serde_json::Value;

/// Longest key emitted by `shorten_key`.
pub const MAX_KEY_LENGTH: usize = 128;

const KEY_SEPARATOR: char = '.';

/// Collapse nested objects and arrays into `(path, leaf)` pairs.
///
/// Paths join object keys and array indices with `.`, in depth-first discovery
/// order. Empty containers contribute no leaves, and neither does a top-level
/// scalar. Null leaves are kept; dropping them is the caller's decision.
pub fn flatten_json(value: &Value) -> Vec<(String, Value)> {
    let mut leaves = Vec::new();
    walk(None, value, &mut leaves);
    leaves
}

fn walk(prefix: Option<&str>, value: &Value, leaves: &mut Vec<(String, Value)>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let path = join(prefix, key);
                walk(Some(&path), child, leaves);
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                let path = join(prefix, &index.to_string());
                walk(Some(&path), child, leaves);
            }
        }
        leaf => {
            if let Some(path) = prefix {
                leaves.push((path.to_string(), leaf.clone()));
            }
        }
    }
}

fn join(prefix: Option<&str>, key: &str) -> String {
    match prefix {
        Some(prefix) => format!("{prefix}{KEY_SEPARATOR}{key}"),
        None => key.to_string(),
    }
}

/// Canonicalize a flattened key for the ingestion endpoint.
///
/// Any character outside `[A-Za-z0-9_]` becomes `_`. Keys longer than
/// `MAX_KEY_LENGTH` characters keep their trailing part, where the leaf name is.
pub fn shorten_key(key: &str) -> String {
    let canonical: Vec<char> = key
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();

    let start = canonical.len().saturating_sub(MAX_KEY_LENGTH);
    canonical[start..].iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flatten_nested_objects() {
        let value = json!({"a": {"b": {"c": 1}}, "d": "x"});
        let leaves = flatten_json(&value);
        assert_eq!(
            leaves,
            vec![
                ("a.b.c".to_string(), json!(1)),
                ("d".to_string(), json!("x")),
            ]
        );
    }

    #[test]
    fn test_flatten_arrays_use_indices() {
        let value = json!({"tags": ["x", {"k": true}]});
        let leaves = flatten_json(&value);
        assert_eq!(
            leaves,
            vec![
                ("tags.0".to_string(), json!("x")),
                ("tags.1.k".to_string(), json!(true)),
            ]
        );
    }

    #[test]
    fn test_flatten_keeps_null_leaves_and_drops_empty_containers() {
        let value = json!({"a": null, "b": {}, "c": []});
        let leaves = flatten_json(&value);
        assert_eq!(leaves, vec![("a".to_string(), Value::Null)]);
    }

    #[test]
    fn test_flatten_top_level_scalar_is_empty() {
        assert!(flatten_json(&json!(42)).is_empty());
        assert!(flatten_json(&json!("text")).is_empty());
    }

    #[test]
    fn test_shorten_key_replaces_separators() {
        assert_eq!(shorten_key("properties.eventName"), "properties_eventName");
        assert_eq!(shorten_key("a-b c/d"), "a_b_c_d");
        assert_eq!(shorten_key("resourceId"), "resourceId");
    }

    #[test]
    fn test_shorten_key_keeps_trailing_part_of_long_keys() {
        let long = format!("{}.leaf", "x".repeat(200));
        let short = shorten_key(&long);
        assert_eq!(short.chars().count(), MAX_KEY_LENGTH);
        assert!(short.ends_with("x_leaf"));
    }

    #[test]
    fn test_shorten_key_non_ascii() {
        assert_eq!(shorten_key("größe"), "gr__e");
    }
}
