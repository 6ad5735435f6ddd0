use backend_domain::{EntityId, EntityLink};

use crate::queries::entity_queries;
use crate::AppError;
use crate::AppState;

pub async fn get_children(state: &AppState, id: EntityId) -> Result<Vec<EntityLink>, AppError> {
    entity_queries::get_entity(state, id).await?;
    Ok(state.link_repo.children_of(id).await?)
}

pub async fn get_parents(state: &AppState, id: EntityId) -> Result<Vec<EntityLink>, AppError> {
    entity_queries::get_entity(state, id).await?;
    Ok(state.link_repo.parents_of(id).await?)
}

#[cfg(test)]
mod tests {
    use backend_domain::LinkCreateRequest;

    use super::*;
    use crate::commands::link_commands;
    use crate::test_support;

    #[tokio::test]
    async fn neighbours_are_stable_between_reads() {
        let state = test_support::state();
        let a = test_support::entity(&state, "package", "A").await;
        let b = test_support::entity(&state, "shipment", "B").await;
        link_commands::create_link(
            &state,
            LinkCreateRequest {
                parent_id: b,
                child_id: a,
                relation: "contains".to_string(),
            },
        )
        .await
        .unwrap();

        let first = get_children(&state, b).await.unwrap();
        let second = get_children(&state, b).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first[0].child_id, a);
        assert_eq!(get_parents(&state, a).await.unwrap()[0].parent_id, b);
        assert!(get_parents(&state, b).await.unwrap().is_empty());

        assert!(matches!(
            get_children(&state, EntityId::generate()).await,
            Err(AppError::NotFound(_))
        ));
    }
}
