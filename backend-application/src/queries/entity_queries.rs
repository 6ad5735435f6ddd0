use backend_domain::{Entity, EntityFilter, EntityId, EntityListQuery, Page};

use crate::validation::{non_blank, parse_entity_type};
use crate::AppError;
use crate::AppState;

pub async fn get_entity(state: &AppState, id: EntityId) -> Result<Entity, AppError> {
    state
        .entity_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("entity not found".to_string()))
}

pub async fn get_entity_by_external_id(
    state: &AppState,
    external_id: &str,
) -> Result<Entity, AppError> {
    state
        .entity_repo
        .find_by_external_id(external_id)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "entity with external_id '{}' not found",
                external_id
            ))
        })
}

pub async fn list_entities(
    state: &AppState,
    query: EntityListQuery,
) -> Result<Vec<Entity>, AppError> {
    let entity_type = non_blank(query.entity_type)
        .map(|raw| parse_entity_type(&raw))
        .transpose()?;
    let filter = EntityFilter {
        entity_type,
        search: non_blank(query.q),
        page: Page::resolve(
            query.skip,
            query.limit,
            state.config.default_page_size,
            state.config.max_page_size,
        ),
    };
    Ok(state.entity_repo.list(&filter).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;

    #[tokio::test]
    async fn lookups_report_not_found() {
        let state = test_support::state();
        let id = test_support::entity(&state, "package", "TRK1").await;
        assert_eq!(get_entity(&state, id).await.unwrap().external_id, "TRK1");
        assert_eq!(get_entity_by_external_id(&state, "TRK1").await.unwrap().id, id);

        let err = get_entity_by_external_id(&state, "nope").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert!(matches!(
            get_entity(&state, EntityId::generate()).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn list_searches_type_and_clamps_limit() {
        let state = test_support::state();
        test_support::entity(&state, "package", "TRK1").await;
        test_support::entity(&state, "shipment", "SHP1").await;
        test_support::entity(&state, "shipment", "SHP2").await;

        let by_search = list_entities(
            &state,
            EntityListQuery {
                q: Some("ship".to_string()),
                ..EntityListQuery::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(by_search.len(), 2);

        let one = list_entities(
            &state,
            EntityListQuery {
                limit: Some(0),
                ..EntityListQuery::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(one.len(), 1);
        assert_eq!(one[0].external_id, "SHP2");

        let err = list_entities(
            &state,
            EntityListQuery {
                entity_type: Some("pallet".to_string()),
                ..EntityListQuery::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
