use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde_json::{json, Value};
use tokio::time::{timeout, Duration};
use tracing::error;

use backend_application::AppState;

use crate::middleware::authorize;

pub async fn root() -> Json<Value> {
    Json(json!({ "message": "Tracelet API is running" }))
}

pub async fn version() -> Json<Value> {
    Json(json!({ "version": env!("CARGO_PKG_VERSION") }))
}

pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let timeout_secs = state.config.request_timeout_seconds.max(1);
    let timeout_duration = Duration::from_secs(timeout_secs);
    let failure = match timeout(timeout_duration, state.health.check_database()).await {
        Ok(Ok(())) => {
            return (
                StatusCode::OK,
                Json(json!({ "api": "ok", "database": "ok" })),
            );
        }
        Ok(Err(err)) => {
            error!("health check failed: {}", err);
            err.to_string()
        }
        Err(_) => {
            error!("health check timeout after {}s", timeout_secs);
            format!("timeout after {}s", timeout_secs)
        }
    };
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(json!({ "api": "ok", "database": "unreachable", "error": failure })),
    )
}

pub async fn metrics_prometheus(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> impl IntoResponse {
    if !authorize(&state.config, &headers) {
        return (StatusCode::UNAUTHORIZED, "unauthorized".to_string()).into_response();
    }
    let payload = state.metrics.render_prometheus();
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; version=0.0.4; charset=utf-8"),
    );
    (headers, payload).into_response()
}
