use async_trait::async_trait;
use thiserror::Error;

use crate::entities::{
    Entity,
    EntityDeletion,
    EntityFilter,
    EntityLink,
    Event,
    EventFilter,
    LinkInsert,
    Page,
    PackageRecord,
    TrackingStats,
};
use crate::value_objects::{EntityId, EventId, PackageStatus};

#[derive(Debug, Error)]
pub enum RepoError {
    /// A uniqueness, foreign-key or check constraint rejected the write.
    #[error("constraint violation: {0}")]
    Conflict(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub type RepoResult<T> = Result<T, RepoError>;

#[async_trait]
pub trait EntityRepository: Send + Sync {
    /// Inserts the entity and any initial events in one transaction.
    async fn insert(&self, entity: &Entity, initial_events: &[Event]) -> RepoResult<()>;
    async fn find_by_id(&self, id: EntityId) -> RepoResult<Option<Entity>>;
    async fn find_by_external_id(&self, external_id: &str) -> RepoResult<Option<Entity>>;
    /// Returns the entities that exist, in the order of `ids`.
    async fn find_many(&self, ids: &[EntityId]) -> RepoResult<Vec<Entity>>;
    async fn list(&self, filter: &EntityFilter) -> RepoResult<Vec<Entity>>;
    /// Returns false when no row matched.
    async fn update(&self, entity: &Entity) -> RepoResult<bool>;
    async fn delete(&self, id: EntityId, force: bool) -> RepoResult<EntityDeletion>;
    async fn ping(&self) -> RepoResult<()>;
}

#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn insert(&self, event: &Event) -> RepoResult<()>;
    async fn find_by_id(&self, id: EventId) -> RepoResult<Option<Event>>;
    /// Oldest first.
    async fn list_for_entity(&self, entity_id: EntityId, page: Page) -> RepoResult<Vec<Event>>;
    /// Newest first.
    async fn list(&self, filter: &EventFilter) -> RepoResult<Vec<Event>>;
    async fn delete(&self, id: EventId) -> RepoResult<bool>;
}

#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Runs the cycle check, the duplicate check and the insert as one atomic
    /// write, so concurrent inserts cannot jointly close a cycle.
    async fn insert_acyclic(&self, link: &EntityLink) -> RepoResult<LinkInsert>;
    /// Links whose parent is `id`, in insertion order.
    async fn children_of(&self, id: EntityId) -> RepoResult<Vec<EntityLink>>;
    /// Links whose child is `id`, in insertion order.
    async fn parents_of(&self, id: EntityId) -> RepoResult<Vec<EntityLink>>;
    async fn delete(&self, parent_id: EntityId, child_id: EntityId) -> RepoResult<bool>;
}

#[async_trait]
pub trait TrackingRepository: Send + Sync {
    /// Packages newest first, filtered on their current status before paging.
    async fn list_packages(
        &self,
        status: Option<PackageStatus>,
        page: Page,
    ) -> RepoResult<Vec<PackageRecord>>;
    async fn stats(&self) -> RepoResult<TrackingStats>;
}
