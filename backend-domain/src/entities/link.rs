// Entity link
// Directed parent -> child edge, identified by the ordered pair

use serde::{Deserialize, Serialize};

use crate::value_objects::EntityId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityLink {
    pub parent_id: EntityId,
    pub child_id: EntityId,
    pub relation: String,
}

/// Outcome of a guarded link insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkInsert {
    Created,
    /// The ordered pair is already linked.
    Duplicate,
    /// The parent is reachable from the child, or both are the same entity.
    WouldCycle,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LinkCreateRequest {
    pub parent_id: EntityId,
    pub child_id: EntityId,
    pub relation: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LinkDeleteQuery {
    pub parent_id: EntityId,
    pub child_id: EntityId,
}

#[derive(Debug, Clone, Serialize)]
pub struct LinkDeleted {
    pub status: &'static str,
    pub parent_id: EntityId,
    pub child_id: EntityId,
}
