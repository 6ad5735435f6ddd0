use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;

use backend_application::AppError;

#[derive(Debug)]
pub enum HttpError {
    Unauthorized,
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    Internal(String),
}

impl From<AppError> for HttpError {
    fn from(value: AppError) -> Self {
        match value {
            AppError::Unauthorized => HttpError::Unauthorized,
            AppError::BadRequest(msg) => HttpError::BadRequest(msg),
            AppError::NotFound(msg) => HttpError::NotFound(msg),
            AppError::Conflict(msg) => HttpError::Conflict(msg),
            AppError::Internal(err) => {
                error!("request failed: {:#}", err);
                HttpError::Internal(err.to_string())
            }
        }
    }
}

impl HttpError {
    // Client-side extraction failures are invalid requests; the rest are ours.
    fn rejected(status: StatusCode, message: String) -> Self {
        if status.is_server_error() {
            error!("request extraction failed: {}", message);
            HttpError::Internal(message)
        } else {
            HttpError::BadRequest(message)
        }
    }
}

impl From<JsonRejection> for HttpError {
    fn from(rejection: JsonRejection) -> Self {
        HttpError::rejected(rejection.status(), rejection.body_text())
    }
}

impl From<PathRejection> for HttpError {
    fn from(rejection: PathRejection) -> Self {
        HttpError::rejected(rejection.status(), rejection.body_text())
    }
}

impl From<QueryRejection> for HttpError {
    fn from(rejection: QueryRejection) -> Self {
        HttpError::rejected(rejection.status(), rejection.body_text())
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    kind: &'static str,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let (status, kind, message) = match self {
            HttpError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                "unauthorized".to_string(),
            ),
            HttpError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "invalid_request", msg),
            HttpError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            // Duplicates answer 400 like other rejected writes.
            HttpError::Conflict(msg) => (StatusCode::BAD_REQUEST, "conflict", msg),
            HttpError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "internal", msg),
        };
        (status, Json(ErrorBody { error: message, kind })).into_response()
    }
}
