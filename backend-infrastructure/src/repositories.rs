mod sqlite_entities;
mod sqlite_events;
mod sqlite_links;
pub mod sqlite_store;
mod sqlite_tracking;

pub use sqlite_store::SqliteStore;
