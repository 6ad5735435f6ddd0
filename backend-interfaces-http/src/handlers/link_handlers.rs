use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;

use backend_application::commands::link_commands;
use backend_application::queries::link_queries;
use backend_application::AppState;
use backend_domain::{EntityId, EntityLink, LinkCreateRequest, LinkDeleteQuery, LinkDeleted};

use crate::error::HttpError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::middleware::authorize;

pub async fn create_link(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiJson(payload): ApiJson<LinkCreateRequest>,
) -> Result<(StatusCode, Json<EntityLink>), HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let link = link_commands::create_link(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(link)))
}

pub async fn get_children(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiPath(id): ApiPath<EntityId>,
) -> Result<Json<Vec<EntityLink>>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let links = link_queries::get_children(&state, id).await?;
    Ok(Json(links))
}

pub async fn get_parents(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiPath(id): ApiPath<EntityId>,
) -> Result<Json<Vec<EntityLink>>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let links = link_queries::get_parents(&state, id).await?;
    Ok(Json(links))
}

pub async fn delete_link(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiQuery(query): ApiQuery<LinkDeleteQuery>,
) -> Result<Json<LinkDeleted>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let deleted = link_commands::delete_link(&state, query).await?;
    Ok(Json(deleted))
}
