use crate::domain::TriggerKind;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name of a function's binding descriptor.
pub const DESCRIPTOR_FILE: &str = "function.json";

const BOM: char = '\u{feff}';

#[derive(Error, Debug)]
pub enum DescriptorError {
    #[error("Failed to read function descriptor {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid function descriptor: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Trigger binding has no name")]
    MissingTriggerName,
}

/// Binding declarations of one function, as written in `function.json`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FunctionDescriptor {
    #[serde(default)]
    pub bindings: Vec<Binding>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Binding {
    #[serde(rename = "type")]
    pub binding_type: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub direction: Option<String>,
}

impl FunctionDescriptor {
    pub fn from_json(text: &str) -> Result<Self, DescriptorError> {
        let text = text.strip_prefix(BOM).unwrap_or(text);
        Ok(serde_json::from_str(text)?)
    }

    pub async fn load(path: &Path) -> Result<Self, DescriptorError> {
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| DescriptorError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_json(&text)
    }

    /// The first binding, which declares the trigger.
    pub fn trigger_binding(&self) -> Option<&Binding> {
        self.bindings.first()
    }

    /// Name under which the host passes the trigger payload.
    pub fn trigger_name(&self) -> Result<&str, DescriptorError> {
        self.trigger_binding()
            .and_then(|binding| binding.name.as_deref())
            .ok_or(DescriptorError::MissingTriggerName)
    }
}

/// Trigger kind declared by the first binding of a descriptor.
pub fn resolve_trigger_kind(descriptor: &FunctionDescriptor) -> TriggerKind {
    descriptor
        .trigger_binding()
        .map(|binding| TriggerKind::from_binding_type(&binding.binding_type))
        .unwrap_or_else(|| TriggerKind::Other(String::new()))
}
