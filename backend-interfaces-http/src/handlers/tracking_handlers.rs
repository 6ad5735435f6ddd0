use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;

use backend_application::commands::tracking_commands;
use backend_application::queries::tracking_queries;
use backend_application::AppState;
use backend_domain::{
    Entity, Event, PackageCreateRequest, PackageEventRequest, PackageListQuery, PackageSummary,
    TrackingResponse, TrackingStats,
};

use crate::error::HttpError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::middleware::authorize;

pub async fn create_package(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiJson(payload): ApiJson<PackageCreateRequest>,
) -> Result<(StatusCode, Json<Entity>), HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let package = tracking_commands::create_package(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(package)))
}

pub async fn add_package_event(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiPath(tracking_number): ApiPath<String>,
    ApiJson(payload): ApiJson<PackageEventRequest>,
) -> Result<(StatusCode, Json<Event>), HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let event = tracking_commands::add_package_event(&state, &tracking_number, payload).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

pub async fn track_package(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiPath(tracking_number): ApiPath<String>,
) -> Result<Json<TrackingResponse>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let tracking = tracking_queries::track_package(&state, &tracking_number).await?;
    Ok(Json(tracking))
}

pub async fn list_packages(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiQuery(query): ApiQuery<PackageListQuery>,
) -> Result<Json<Vec<PackageSummary>>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let packages = tracking_queries::list_packages(&state, query).await?;
    Ok(Json(packages))
}

pub async fn tracking_stats(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<TrackingStats>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let stats = tracking_queries::tracking_stats(&state).await?;
    Ok(Json(stats))
}
