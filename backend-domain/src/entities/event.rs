// Event entity
// Timestamped status record attached to an entity

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::Page;
use crate::value_objects::{EntityId, EventId, JsonMap, PackageStatus};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub entity_id: EntityId,
    pub event_type: PackageStatus,
    pub location: Option<String>,
    pub actor: Option<String>,
    pub payload: Option<JsonMap>,
    pub timestamp: DateTime<Utc>,
}

impl Event {
    pub fn new(
        entity_id: EntityId,
        event_type: PackageStatus,
        location: Option<String>,
        actor: Option<String>,
        payload: Option<JsonMap>,
    ) -> Self {
        Self {
            id: EventId::generate(),
            entity_id,
            event_type,
            location,
            actor,
            payload,
            timestamp: Utc::now().trunc_subsecs(6),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventCreateRequest {
    pub entity_id: EntityId,
    pub event_type: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub actor: Option<String>,
    #[serde(default)]
    pub payload: Option<JsonMap>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventListQuery {
    pub skip: Option<u32>,
    pub limit: Option<u32>,
    pub event_type: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub skip: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EventFilter {
    pub event_type: Option<PackageStatus>,
    pub location: Option<String>,
    pub page: Page,
}

#[derive(Debug, Clone, Serialize)]
pub struct EventDeleted {
    pub status: &'static str,
    pub event_id: EventId,
}
