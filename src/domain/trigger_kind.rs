use std::fmt;
use std::str::FromStr;

/// Trigger binding type of a function, taken from its descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerKind {
    Blob,
    EventHub,
    /// Any other binding type. Invocations of this kind are ignored.
    Other(String),
}

impl TriggerKind {
    pub fn from_binding_type(binding_type: &str) -> Self {
        match binding_type {
            "blobTrigger" => TriggerKind::Blob,
            "eventHubTrigger" => TriggerKind::EventHub,
            other => TriggerKind::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            TriggerKind::Blob => "blobTrigger",
            TriggerKind::EventHub => "eventHubTrigger",
            TriggerKind::Other(name) => name,
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, TriggerKind::Other(_))
    }
}

impl FromStr for TriggerKind {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_binding_type(s))
    }
}

impl fmt::Display for TriggerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
