use std::sync::Arc;

use backend_domain::{EntityCreateRequest, EntityId, RuntimeConfig};
use backend_infrastructure::{DefaultHealthService, SqliteStore};

use crate::commands::entity_commands;
use crate::{AppState, Metrics};

pub(crate) fn state() -> AppState {
    let store = Arc::new(SqliteStore::open_in_memory().expect("in-memory store"));
    AppState {
        config: RuntimeConfig::default(),
        entity_repo: store.clone(),
        event_repo: store.clone(),
        link_repo: store.clone(),
        tracking_repo: store.clone(),
        health: Arc::new(DefaultHealthService::new(store)),
        metrics: Arc::new(Metrics::default()),
    }
}

pub(crate) async fn entity(state: &AppState, entity_type: &str, external_id: &str) -> EntityId {
    entity_commands::create_entity(
        state,
        EntityCreateRequest {
            entity_type: entity_type.to_string(),
            external_id: Some(external_id.to_string()),
            extra_data: None,
        },
    )
    .await
    .expect("create entity")
    .id
}
