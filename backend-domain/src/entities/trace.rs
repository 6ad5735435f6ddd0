// Trace views over the link graph

use serde::{Deserialize, Serialize};

use crate::entities::{Entity, EntitySummary};
use crate::value_objects::{EntityId, EntityType};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TraceQuery {
    pub direction: Option<String>,
    pub max_depth: Option<u32>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceCount {
    pub ancestors: usize,
    pub descendants: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceResult {
    pub entity: Entity,
    pub ancestors: Vec<EntitySummary>,
    pub descendants: Vec<EntitySummary>,
    pub count: TraceCount,
}

/// Direct neighbour of an entity together with the relation on the connecting link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeNeighbor {
    pub id: EntityId,
    #[serde(rename = "type")]
    pub entity_type: EntityType,
    pub external_id: String,
    pub relation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityTree {
    pub entity: EntitySummary,
    pub parents: Vec<TreeNeighbor>,
    pub children: Vec<TreeNeighbor>,
}
