use tracing::error;

use backend_domain::{EntityId, Event, EventFilter, EventId, EventListQuery, Page, PageQuery};

use crate::queries::entity_queries;
use crate::validation::{non_blank, parse_status};
use crate::AppError;
use crate::AppState;

pub async fn get_event(state: &AppState, id: EventId) -> Result<Event, AppError> {
    state
        .event_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("event not found".to_string()))
}

pub async fn list_entity_events(
    state: &AppState,
    entity_id: EntityId,
    query: PageQuery,
) -> Result<Vec<Event>, AppError> {
    let entity = entity_queries::get_entity(state, entity_id).await?;
    let page = Page::resolve(
        query.skip,
        query.limit,
        state.config.default_page_size,
        state.config.max_page_size,
    );
    state
        .event_repo
        .list_for_entity(entity.id, page)
        .await
        .map_err(|err| {
            error!("failed to list events for {}: {}", entity.id, err);
            err.into()
        })
}

pub async fn list_events(state: &AppState, query: EventListQuery) -> Result<Vec<Event>, AppError> {
    let event_type = non_blank(query.event_type)
        .map(|raw| parse_status(&raw))
        .transpose()?;
    let filter = EventFilter {
        event_type,
        location: non_blank(query.location),
        page: Page::resolve(
            query.skip,
            query.limit,
            state.config.default_page_size,
            state.config.max_page_size,
        ),
    };
    Ok(state.event_repo.list(&filter).await?)
}
