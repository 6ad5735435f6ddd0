use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use rusqlite::types::Type;
use rusqlite::{Connection, ErrorCode, Row};
use tracing::info;

use backend_domain::{
    DbConfig, Entity, EntityLink, Event, JsonMap, RepoError, RepoResult,
};

use crate::utils::{format_timestamp, parse_timestamp};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS entities (
    id TEXT PRIMARY KEY,
    type TEXT NOT NULL,
    external_id TEXT NOT NULL UNIQUE CHECK (length(external_id) > 0),
    extra_data TEXT NOT NULL DEFAULT '{}',
    created_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_entities_type ON entities(type);
CREATE INDEX IF NOT EXISTS idx_entities_created_at ON entities(created_at);

CREATE TABLE IF NOT EXISTS events (
    id TEXT PRIMARY KEY,
    entity_id TEXT NOT NULL REFERENCES entities(id) ON DELETE CASCADE,
    event_type TEXT NOT NULL,
    location TEXT,
    actor TEXT,
    payload TEXT,
    timestamp TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_events_entity_id ON events(entity_id);
CREATE INDEX IF NOT EXISTS idx_events_event_type ON events(event_type);
CREATE INDEX IF NOT EXISTS idx_events_timestamp ON events(timestamp);

CREATE TABLE IF NOT EXISTS entity_links (
    parent_id TEXT NOT NULL REFERENCES entities(id) ON DELETE CASCADE,
    child_id TEXT NOT NULL REFERENCES entities(id) ON DELETE CASCADE,
    relation TEXT NOT NULL,
    PRIMARY KEY (parent_id, child_id),
    CHECK (parent_id <> child_id)
);
CREATE INDEX IF NOT EXISTS idx_entity_links_child ON entity_links(child_id);
"#;

pub(crate) const ENTITY_COLUMNS: &str = "id, type, external_id, extra_data, created_at";
pub(crate) const EVENT_COLUMNS: &str =
    "id, entity_id, event_type, location, actor, payload, timestamp";
pub(crate) const LINK_COLUMNS: &str = "parent_id, child_id, relation";

/// SQLite-backed store implementing every repository port.
///
/// One connection is shared behind a mutex; each write runs in its own
/// transaction, which rolls back when dropped without a commit.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    pub fn open(config: &DbConfig) -> Result<Self> {
        if config.database_path == ":memory:" {
            return Self::open_in_memory();
        }
        let path = Path::new(&config.database_path);
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)
            .map_err(|err| anyhow!("failed to open database {}: {}", path.display(), err))?;
        let store = Self::from_connection(conn)?;
        info!(path = %path.display(), "sqlite store opened");
        Ok(store)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|err| anyhow!("failed to open in-memory database: {}", err))?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.ensure_schema()?;
        Ok(store)
    }

    pub fn ensure_schema(&self) -> Result<()> {
        self.with_conn(|conn| conn.execute_batch(SCHEMA))
            .map_err(|err| anyhow!("failed to create schema: {}", err))
    }

    pub(crate) fn with_conn<T>(
        &self,
        f: impl FnOnce(&mut Connection) -> rusqlite::Result<T>,
    ) -> RepoResult<T> {
        let mut conn = self
            .conn
            .lock()
            .map_err(|_| RepoError::Internal(anyhow!("sqlite connection lock poisoned")))?;
        f(&mut conn).map_err(map_sqlite_error)
    }
}

pub(crate) fn map_sqlite_error(err: rusqlite::Error) -> RepoError {
    match &err {
        rusqlite::Error::SqliteFailure(failure, message)
            if failure.code == ErrorCode::ConstraintViolation =>
        {
            RepoError::Conflict(message.clone().unwrap_or_else(|| failure.to_string()))
        }
        _ => RepoError::Internal(err.into()),
    }
}

fn parse_column<T, E>(row: &Row<'_>, idx: usize, parse: impl FnOnce(&str) -> Result<T, E>) -> rusqlite::Result<T>
where
    E: std::error::Error + Send + Sync + 'static,
{
    let raw: String = row.get(idx)?;
    parse(&raw).map_err(|err| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err)))
}

fn parse_json_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<JsonMap>> {
    let raw: Option<String> = row.get(idx)?;
    raw.map(|text| {
        serde_json::from_str::<JsonMap>(&text)
            .map_err(|err| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err)))
    })
    .transpose()
}

pub(crate) fn encode_json(value: &JsonMap) -> rusqlite::Result<String> {
    serde_json::to_string(value).map_err(|err| rusqlite::Error::ToSqlConversionFailure(Box::new(err)))
}

pub(crate) fn entity_from_row(row: &Row<'_>) -> rusqlite::Result<Entity> {
    Ok(Entity {
        id: parse_column(row, 0, str::parse)?,
        entity_type: parse_column(row, 1, str::parse)?,
        external_id: row.get(2)?,
        extra_data: parse_json_column(row, 3)?.unwrap_or_default(),
        created_at: parse_column(row, 4, parse_timestamp)?,
    })
}

pub(crate) fn event_from_row(row: &Row<'_>) -> rusqlite::Result<Event> {
    Ok(Event {
        id: parse_column(row, 0, str::parse)?,
        entity_id: parse_column(row, 1, str::parse)?,
        event_type: parse_column(row, 2, str::parse)?,
        location: row.get(3)?,
        actor: row.get(4)?,
        payload: parse_json_column(row, 5)?,
        timestamp: parse_column(row, 6, parse_timestamp)?,
    })
}

pub(crate) fn link_from_row(row: &Row<'_>) -> rusqlite::Result<EntityLink> {
    Ok(EntityLink {
        parent_id: parse_column(row, 0, str::parse)?,
        child_id: parse_column(row, 1, str::parse)?,
        relation: row.get(2)?,
    })
}

pub(crate) fn insert_event_row(conn: &Connection, event: &Event) -> rusqlite::Result<()> {
    let payload = event.payload.as_ref().map(encode_json).transpose()?;
    conn.execute(
        &format!("INSERT INTO events ({EVENT_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"),
        rusqlite::params![
            event.id.to_string(),
            event.entity_id.to_string(),
            event.event_type.as_str(),
            event.location,
            event.actor,
            payload,
            format_timestamp(event.timestamp),
        ],
    )?;
    Ok(())
}
