use crate::app::AppState;
use crate::dispatch::{DispatchError, DispatchSummary};
use crate::trigger::{DescriptorError, FunctionDescriptor, resolve_trigger_kind};
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;
use thiserror::Error;
use tracing::{Instrument, error, info, info_span};

/// Invocation request sent by the Functions host.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InvokeRequest {
    #[serde(default)]
    pub data: Map<String, Value>,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl InvokeRequest {
    fn invocation_id(&self) -> String {
        self.metadata
            .get("InvocationId")
            .and_then(Value::as_str)
            .map_or_else(|| uuid::Uuid::new_v4().to_string(), str::to_string)
    }
}

/// Invocation response returned to the Functions host.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InvokeResponse {
    #[serde(default)]
    pub outputs: Map<String, Value>,
    #[serde(default)]
    pub logs: Vec<String>,
    #[serde(default)]
    pub return_value: Value,
}

impl InvokeResponse {
    fn with_log(message: impl Into<String>) -> Self {
        Self {
            logs: vec![message.into()],
            ..Self::default()
        }
    }
}

#[derive(Error, Debug)]
pub enum InvocationError {
    #[error("{0}")]
    Config(String),
    #[error("Unknown function: {0}")]
    InvalidFunctionName(String),
    #[error(transparent)]
    Descriptor(#[from] DescriptorError),
    #[error("Invocation has no data for trigger binding '{0}'")]
    MissingBinding(String),
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

impl InvocationError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidFunctionName(_) => StatusCode::NOT_FOUND,
            Self::Descriptor(DescriptorError::Io { source, .. })
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                StatusCode::NOT_FOUND
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for InvocationError {
    fn into_response(self) -> Response {
        (self.status(), Json(InvokeResponse::with_log(self.to_string()))).into_response()
    }
}

/// Handler for POST /{function}
pub async fn invoke_handler(
    State(state): State<Arc<AppState>>,
    Path(function): Path<String>,
    Json(request): Json<InvokeRequest>,
) -> Result<Json<InvokeResponse>, InvocationError> {
    let invocation_id = request.invocation_id();
    let span = info_span!("invocation", %invocation_id, %function);

    async move {
        match invoke(&state, &function, request).await {
            Ok(Some(summary)) => {
                let message = format!(
                    "Forwarded {} of {} records",
                    summary.delivered, summary.processed
                );
                info!(processed = summary.processed, "{message}");
                Ok(Json(InvokeResponse::with_log(message)))
            }
            Ok(None) => {
                info!("Trigger type is not forwarded; invocation ignored");
                Ok(Json(InvokeResponse::with_log("Trigger type ignored")))
            }
            Err(e) => {
                error!(error = %e, "Invocation failed");
                Err(e)
            }
        }
    }
    .instrument(span)
    .await
}

async fn invoke(
    state: &AppState,
    function: &str,
    mut request: InvokeRequest,
) -> Result<Option<DispatchSummary>, InvocationError> {
    let router = state
        .router()
        .map_err(|reason| InvocationError::Config(reason.to_string()))?;

    let path = state
        .descriptor_path(function)
        .ok_or_else(|| InvocationError::InvalidFunctionName(function.to_string()))?;
    let descriptor = FunctionDescriptor::load(&path).await?;

    let kind = resolve_trigger_kind(&descriptor);
    if !kind.is_supported() {
        return Ok(None);
    }

    let name = descriptor.trigger_name()?;
    let payload = request
        .data
        .get_mut(name)
        .map(Value::take)
        .ok_or_else(|| InvocationError::MissingBinding(name.to_string()))?;

    info!(trigger = %kind, "Dispatching invocation");
    Ok(router.route(&kind, payload).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_uses_host_invocation_id() {
        let request: InvokeRequest = serde_json::from_value(json!({
            "Data": {},
            "Metadata": {"InvocationId": "8b4f2c1e"}
        }))
        .unwrap();
        assert_eq!(request.invocation_id(), "8b4f2c1e");
    }

    #[test]
    fn test_request_generates_invocation_id() {
        let request: InvokeRequest = serde_json::from_value(json!({"Data": {}})).unwrap();
        assert_eq!(request.invocation_id().len(), 36);
    }

    #[test]
    fn test_response_shape() {
        let body = serde_json::to_value(InvokeResponse::with_log("ok")).unwrap();
        assert_eq!(
            body,
            json!({"Outputs": {}, "Logs": ["ok"], "ReturnValue": null})
        );
    }

    #[test]
    fn test_error_status() {
        assert_eq!(
            InvocationError::InvalidFunctionName("..".into()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            InvocationError::Config("missing".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            InvocationError::MissingBinding("myBlob".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
