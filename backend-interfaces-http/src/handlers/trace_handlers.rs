use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;

use backend_application::queries::trace_queries;
use backend_application::AppState;
use backend_domain::{EntityId, EntityTree, TraceQuery, TraceResult};

use crate::error::HttpError;
use crate::extract::{ApiPath, ApiQuery};
use crate::middleware::authorize;

pub async fn trace_entity(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiPath(id): ApiPath<EntityId>,
    ApiQuery(query): ApiQuery<TraceQuery>,
) -> Result<Json<TraceResult>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let trace = trace_queries::trace_entity(&state, id, query).await?;
    Ok(Json(trace))
}

pub async fn entity_tree(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiPath(id): ApiPath<EntityId>,
) -> Result<Json<EntityTree>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let tree = trace_queries::entity_tree(&state, id).await?;
    Ok(Json(tree))
}
