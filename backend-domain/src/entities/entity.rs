// Entity
// A trackable thing: package, shipment, item or container

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::Page;
use crate::value_objects::{EntityId, EntityType, JsonMap};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    #[serde(rename = "type")]
    pub entity_type: EntityType,
    pub external_id: String,
    pub extra_data: JsonMap,
    pub created_at: DateTime<Utc>,
}

impl Entity {
    pub fn new(entity_type: EntityType, external_id: String, extra_data: JsonMap) -> Self {
        Self {
            id: EntityId::generate(),
            entity_type,
            external_id,
            extra_data,
            created_at: Utc::now().trunc_subsecs(6),
        }
    }

    pub fn summary(&self) -> EntitySummary {
        EntitySummary {
            id: self.id,
            entity_type: self.entity_type,
            external_id: self.external_id.clone(),
            extra_data: self.extra_data.clone(),
        }
    }
}

/// Entity without its creation time, as listed by traces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySummary {
    pub id: EntityId,
    #[serde(rename = "type")]
    pub entity_type: EntityType,
    pub external_id: String,
    pub extra_data: JsonMap,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EntityCreateRequest {
    #[serde(rename = "type")]
    pub entity_type: String,
    #[serde(default)]
    pub external_id: Option<String>,
    #[serde(default)]
    pub extra_data: Option<JsonMap>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EntityUpdateRequest {
    #[serde(default, rename = "type")]
    pub entity_type: Option<String>,
    #[serde(default)]
    pub external_id: Option<String>,
    #[serde(default)]
    pub extra_data: Option<JsonMap>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EntityListQuery {
    pub skip: Option<u32>,
    pub limit: Option<u32>,
    pub q: Option<String>,
    #[serde(rename = "type")]
    pub entity_type: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EntityDeleteQuery {
    #[serde(default)]
    pub force: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EntityFilter {
    pub entity_type: Option<EntityType>,
    pub search: Option<String>,
    pub page: Page,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DependentCounts {
    pub events: u64,
    pub links: u64,
}

impl DependentCounts {
    pub fn is_empty(&self) -> bool {
        self.events == 0 && self.links == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityDeletion {
    NotFound,
    Blocked(DependentCounts),
    Deleted(DependentCounts),
}

#[derive(Debug, Clone, Serialize)]
pub struct EntityDeleted {
    pub status: &'static str,
    pub entity_id: EntityId,
    pub removed_events: u64,
    pub removed_links: u64,
}
