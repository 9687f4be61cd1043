use super::config::Config;
use crate::sender::HttpIngestionClient;
use crate::trigger::{DESCRIPTOR_FILE, TriggerRouter};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info};

/// Shared state of the custom handler.
///
/// A configuration fault does not stop the server: it is kept here and
/// reported by every invocation instead.
pub struct AppState {
    router: Result<TriggerRouter, String>,
    function_root: PathBuf,
}

impl AppState {
    pub fn new(router: TriggerRouter, function_root: impl Into<PathBuf>) -> Self {
        Self {
            router: Ok(router),
            function_root: function_root.into(),
        }
    }

    pub fn misconfigured(reason: impl Into<String>, function_root: impl Into<PathBuf>) -> Self {
        Self {
            router: Err(reason.into()),
            function_root: function_root.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let client = config
            .client_config()
            .map_err(|e| e.to_string())
            .and_then(|client_config| {
                HttpIngestionClient::new(client_config).map_err(|e| e.to_string())
            });

        match client {
            Ok(client) => {
                info!(ingestion_url = %client.ingestion_url(), "Ingestion client ready");
                Self::new(TriggerRouter::new(Arc::new(client)), &config.function_root)
            }
            Err(reason) => {
                error!(error = %reason, "Ingestion is not configured; invocations will fail");
                Self::misconfigured(reason, &config.function_root)
            }
        }
    }

    pub fn router(&self) -> Result<&TriggerRouter, &str> {
        self.router.as_ref().map_err(String::as_str)
    }

    /// Descriptor path of `function`, or `None` if the name could escape the
    /// function root.
    pub fn descriptor_path(&self, function: &str) -> Option<PathBuf> {
        let valid = !function.is_empty()
            && function != "."
            && function != ".."
            && !function.contains(['/', '\\']);
        valid.then(|| self.function_root.join(function).join(DESCRIPTOR_FILE))
    }

    pub fn function_root(&self) -> &Path {
        &self.function_root
    }
}
