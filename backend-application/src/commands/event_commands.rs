use tracing::info;

use backend_domain::{Event, EventCreateRequest, EventDeleted, EventId};

use crate::queries::entity_queries;
use crate::validation::{non_blank, parse_status};
use crate::AppError;
use crate::AppState;

pub async fn create_event(state: &AppState, request: EventCreateRequest) -> Result<Event, AppError> {
    let event_type = parse_status(&request.event_type)?;
    let entity = entity_queries::get_entity(state, request.entity_id).await?;

    let event = Event::new(
        entity.id,
        event_type,
        non_blank(request.location),
        non_blank(request.actor),
        request.payload,
    );
    state.event_repo.insert(&event).await?;
    state.metrics.record_events(1);
    info!(
        event_id = %event.id,
        entity_id = %event.entity_id,
        event_type = %event.event_type,
        "event recorded"
    );
    Ok(event)
}

pub async fn delete_event(state: &AppState, id: EventId) -> Result<EventDeleted, AppError> {
    if !state.event_repo.delete(id).await? {
        return Err(AppError::NotFound("event not found".to_string()));
    }
    info!(event_id = %id, "event deleted");
    Ok(EventDeleted {
        status: "deleted",
        event_id: id,
    })
}

#[cfg(test)]
mod tests {
    use backend_domain::{EntityId, PackageStatus};

    use super::*;
    use crate::test_support;

    fn request(entity_id: EntityId, event_type: &str) -> EventCreateRequest {
        EventCreateRequest {
            entity_id,
            event_type: event_type.to_string(),
            location: Some("  Berlin Hub ".to_string()),
            actor: Some(String::new()),
            payload: None,
        }
    }

    #[tokio::test]
    async fn records_event_for_known_entity() {
        let state = test_support::state();
        let id = test_support::entity(&state, "package", "EV-1").await;
        let event = create_event(&state, request(id, "In_Transit")).await.unwrap();
        assert_eq!(event.event_type, PackageStatus::InTransit);
        assert_eq!(event.location.as_deref(), Some("Berlin Hub"));
        assert!(event.actor.is_none());
    }

    #[tokio::test]
    async fn unknown_entity_or_type_is_rejected() {
        let state = test_support::state();
        let err = create_event(&state, request(EntityId::generate(), "created"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let id = test_support::entity(&state, "package", "EV-2").await;
        let err = create_event(&state, request(id, "lost_in_space"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn delete_missing_event_is_not_found() {
        let state = test_support::state();
        let err = delete_event(&state, EventId::generate()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
