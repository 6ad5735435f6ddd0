use tracing::{info, warn};

use backend_domain::{
    Entity, EntityCreateRequest, EntityDeleted, EntityDeletion, EntityId, EntityUpdateRequest,
    RepoError,
};

use crate::queries::entity_queries;
use crate::validation::{parse_entity_type, required_text};
use crate::AppError;
use crate::AppState;

fn duplicate_external_id(external_id: &str) -> AppError {
    AppError::Conflict(format!(
        "entity with external_id '{}' already exists",
        external_id
    ))
}

/// Maps a lost uniqueness race at commit time to the same error as the up-front check.
fn unique_violation(external_id: &str) -> impl FnOnce(RepoError) -> AppError + '_ {
    move |err| match err {
        RepoError::Conflict(_) => duplicate_external_id(external_id),
        other => other.into(),
    }
}

pub async fn create_entity(
    state: &AppState,
    request: EntityCreateRequest,
) -> Result<Entity, AppError> {
    let entity_type = parse_entity_type(&request.entity_type)?;
    let external_id = required_text("external_id", request.external_id.as_deref())?;
    if state
        .entity_repo
        .find_by_external_id(&external_id)
        .await?
        .is_some()
    {
        return Err(duplicate_external_id(&external_id));
    }

    let entity = Entity::new(entity_type, external_id, request.extra_data.unwrap_or_default());
    state
        .entity_repo
        .insert(&entity, &[])
        .await
        .map_err(unique_violation(&entity.external_id))?;
    state.metrics.record_entity_created();
    info!(
        entity_id = %entity.id,
        external_id = %entity.external_id,
        entity_type = %entity.entity_type,
        "entity created"
    );
    Ok(entity)
}

pub async fn update_entity(
    state: &AppState,
    id: EntityId,
    patch: EntityUpdateRequest,
) -> Result<Entity, AppError> {
    let mut entity = entity_queries::get_entity(state, id).await?;
    if let Some(raw) = patch.entity_type.as_deref() {
        entity.entity_type = parse_entity_type(raw)?;
    }
    if let Some(raw) = patch.external_id.as_deref() {
        let external_id = required_text("external_id", Some(raw))?;
        if external_id != entity.external_id {
            if state
                .entity_repo
                .find_by_external_id(&external_id)
                .await?
                .is_some()
            {
                return Err(duplicate_external_id(&external_id));
            }
            entity.external_id = external_id;
        }
    }
    if let Some(extra_data) = patch.extra_data {
        entity.extra_data = extra_data;
    }

    let updated = state
        .entity_repo
        .update(&entity)
        .await
        .map_err(unique_violation(&entity.external_id))?;
    if !updated {
        return Err(AppError::NotFound("entity not found".to_string()));
    }
    info!(entity_id = %entity.id, "entity updated");
    Ok(entity)
}

pub async fn delete_entity(
    state: &AppState,
    id: EntityId,
    force: bool,
) -> Result<EntityDeleted, AppError> {
    match state.entity_repo.delete(id, force).await? {
        EntityDeletion::NotFound => Err(AppError::NotFound("entity not found".to_string())),
        EntityDeletion::Blocked(counts) => {
            warn!(
                entity_id = %id,
                events = counts.events,
                links = counts.links,
                "entity delete blocked by dependents"
            );
            Err(AppError::Conflict(format!(
                "entity has {} event(s) and {} link(s); delete with force=true to remove them",
                counts.events, counts.links
            )))
        }
        EntityDeletion::Deleted(counts) => {
            state.metrics.record_entity_deleted();
            info!(
                entity_id = %id,
                removed_events = counts.events,
                removed_links = counts.links,
                "entity deleted"
            );
            Ok(EntityDeleted {
                status: "deleted",
                entity_id: id,
                removed_events: counts.events,
                removed_links: counts.links,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use backend_domain::{EntityType, JsonMap};
    use serde_json::json;

    use super::*;
    use crate::test_support;

    fn create_request(entity_type: &str, external_id: &str) -> EntityCreateRequest {
        EntityCreateRequest {
            entity_type: entity_type.to_string(),
            external_id: Some(external_id.to_string()),
            extra_data: None,
        }
    }

    #[tokio::test]
    async fn create_normalizes_input() {
        let state = test_support::state();
        let entity = create_entity(&state, create_request("PACKAGE", "  TRK1 "))
            .await
            .unwrap();
        assert_eq!(entity.entity_type, EntityType::Package);
        assert_eq!(entity.external_id, "TRK1");
        assert!(entity.extra_data.is_empty());
    }

    #[tokio::test]
    async fn duplicate_external_id_conflicts() {
        let state = test_support::state();
        create_entity(&state, create_request("package", "TRK1"))
            .await
            .unwrap();
        let err = create_entity(&state, create_request("shipment", "TRK1"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(err.to_string(), "entity with external_id 'TRK1' already exists");
    }

    #[tokio::test]
    async fn create_rejects_bad_type_and_blank_external_id() {
        let state = test_support::state();
        let err = create_entity(&state, create_request("pallet", "X"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));

        let err = create_entity(
            &state,
            EntityCreateRequest {
                entity_type: "item".to_string(),
                external_id: None,
                extra_data: None,
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "external_id is required");
    }

    #[tokio::test]
    async fn update_rechecks_uniqueness_and_replaces_extra_data() {
        let state = test_support::state();
        let first = test_support::entity(&state, "package", "A").await;
        test_support::entity(&state, "package", "B").await;

        let err = update_entity(
            &state,
            first,
            EntityUpdateRequest {
                external_id: Some("B".to_string()),
                ..EntityUpdateRequest::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let mut extra = JsonMap::new();
        extra.insert("color".to_string(), json!("red"));
        let updated = update_entity(
            &state,
            first,
            EntityUpdateRequest {
                entity_type: Some("container".to_string()),
                external_id: Some("A".to_string()),
                extra_data: Some(extra.clone()),
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.entity_type, EntityType::Container);
        assert_eq!(updated.extra_data, extra);

        let missing = update_entity(&state, EntityId::generate(), EntityUpdateRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(missing, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn delete_without_dependents_needs_no_force() {
        let state = test_support::state();
        let id = test_support::entity(&state, "item", "LONE").await;
        let deleted = delete_entity(&state, id, false).await.unwrap();
        assert_eq!(deleted.removed_events, 0);
        assert_eq!(deleted.removed_links, 0);

        let err = delete_entity(&state, id, false).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
