use super::state::AppState;
use crate::handler::health::health_handler;
use crate::handler::invoke::invoke_handler;
use axum::Router;
use axum::routing::{get, post};
use std::sync::Arc;

/// Build the custom handler router (health + one route per function name).
pub fn build_router(state: Arc<AppState>) -> Router {
    let v1_health_router = Router::new().route("/v1/health", get(health_handler));

    let invoke_router = Router::new()
        .route("/{function}", post(invoke_handler))
        .with_state(state);

    Router::new().merge(v1_health_router).merge(invoke_router)
}
