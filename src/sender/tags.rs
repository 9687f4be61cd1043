use regex::{Regex, RegexBuilder};
use std::collections::BTreeMap;
use thiserror::Error;

/// Environment variables starting with this prefix declare tag patterns.
pub const TAG_ENV_PREFIX: &str = "Tag_";

#[derive(Error, Debug)]
pub enum TagError {
    #[error("Invalid pattern for tag '{name}': {source}")]
    InvalidPattern {
        name: String,
        #[source]
        source: regex::Error,
    },
}

/// Case-insensitive tag patterns configured for the ingestion endpoint.
///
/// Patterns are validated when loaded but are not applied to records.
#[derive(Debug, Clone, Default)]
pub struct TagRules {
    rules: BTreeMap<String, Regex>,
}

impl TagRules {
    /// Build rules from `(name, pattern)` pairs.
    pub fn from_patterns<I, K, V>(patterns: I) -> Result<Self, TagError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: AsRef<str>,
    {
        let mut rules = BTreeMap::new();
        for (name, pattern) in patterns {
            let name = name.into();
            let regex = RegexBuilder::new(pattern.as_ref())
                .case_insensitive(true)
                .build()
                .map_err(|source| TagError::InvalidPattern {
                    name: name.clone(),
                    source,
                })?;
            rules.insert(name, regex);
        }
        Ok(Self { rules })
    }

    /// Collect `Tag_<name>=<pattern>` entries, stripping the prefix.
    pub fn patterns_from_vars<I>(vars: I) -> Vec<(String, String)>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        vars.into_iter()
            .filter_map(|(key, value)| {
                key.strip_prefix(TAG_ENV_PREFIX)
                    .map(|name| (name.to_string(), value))
            })
            .collect()
    }

    pub fn get(&self, name: &str) -> Option<&Regex> {
        self.rules.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
