use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;

use backend_application::commands::entity_commands;
use backend_application::queries::entity_queries;
use backend_application::AppState;
use backend_domain::{
    Entity, EntityCreateRequest, EntityDeleteQuery, EntityDeleted, EntityId, EntityListQuery,
    EntityUpdateRequest,
};

use crate::error::HttpError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::middleware::authorize;

pub async fn create_entity(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiJson(payload): ApiJson<EntityCreateRequest>,
) -> Result<(StatusCode, Json<Entity>), HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let entity = entity_commands::create_entity(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(entity)))
}

pub async fn list_entities(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiQuery(query): ApiQuery<EntityListQuery>,
) -> Result<Json<Vec<Entity>>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let entities = entity_queries::list_entities(&state, query).await?;
    Ok(Json(entities))
}

pub async fn get_entity(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiPath(id): ApiPath<EntityId>,
) -> Result<Json<Entity>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let entity = entity_queries::get_entity(&state, id).await?;
    Ok(Json(entity))
}

pub async fn get_entity_by_external_id(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiPath(external_id): ApiPath<String>,
) -> Result<Json<Entity>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let entity = entity_queries::get_entity_by_external_id(&state, &external_id).await?;
    Ok(Json(entity))
}

pub async fn update_entity(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiPath(id): ApiPath<EntityId>,
    ApiJson(payload): ApiJson<EntityUpdateRequest>,
) -> Result<Json<Entity>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let entity = entity_commands::update_entity(&state, id, payload).await?;
    Ok(Json(entity))
}

pub async fn delete_entity(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiPath(id): ApiPath<EntityId>,
    ApiQuery(query): ApiQuery<EntityDeleteQuery>,
) -> Result<Json<EntityDeleted>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let deleted = entity_commands::delete_entity(&state, id, query.force).await?;
    Ok(Json(deleted))
}
