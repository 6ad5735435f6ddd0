use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;

use backend_application::commands::event_commands;
use backend_application::queries::event_queries;
use backend_application::AppState;
use backend_domain::{EntityId, Event, EventCreateRequest, EventDeleted, EventId, EventListQuery, PageQuery};

use crate::error::HttpError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::middleware::authorize;

pub async fn create_event(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiJson(payload): ApiJson<EventCreateRequest>,
) -> Result<(StatusCode, Json<Event>), HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let event = event_commands::create_event(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

pub async fn list_entity_events(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiPath(entity_id): ApiPath<EntityId>,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> Result<Json<Vec<Event>>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let events = event_queries::list_entity_events(&state, entity_id, query).await?;
    Ok(Json(events))
}

pub async fn get_event(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiPath(id): ApiPath<EventId>,
) -> Result<Json<Event>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let event = event_queries::get_event(&state, id).await?;
    Ok(Json(event))
}

pub async fn list_events(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiQuery(query): ApiQuery<EventListQuery>,
) -> Result<Json<Vec<Event>>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let events = event_queries::list_events(&state, query).await?;
    Ok(Json(events))
}

pub async fn delete_event(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiPath(id): ApiPath<EventId>,
) -> Result<Json<EventDeleted>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let deleted = event_commands::delete_event(&state, id).await?;
    Ok(Json(deleted))
}
