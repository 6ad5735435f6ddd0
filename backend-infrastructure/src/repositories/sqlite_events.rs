use async_trait::async_trait;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, OptionalExtension};

use backend_domain::{EntityId, Event, EventFilter, EventId, EventRepository, Page, RepoResult};

use super::sqlite_store::{event_from_row, insert_event_row, SqliteStore, EVENT_COLUMNS};
use crate::utils::contains_pattern;

#[async_trait]
impl EventRepository for SqliteStore {
    async fn insert(&self, event: &Event) -> RepoResult<()> {
        self.with_conn(|conn| insert_event_row(conn, event))
    }

    async fn find_by_id(&self, id: EventId) -> RepoResult<Option<Event>> {
        self.with_conn(|conn| {
            conn.query_row(
                &format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = ?1"),
                params![id.to_string()],
                event_from_row,
            )
            .optional()
        })
    }

    async fn list_for_entity(&self, entity_id: EntityId, page: Page) -> RepoResult<Vec<Event>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {EVENT_COLUMNS} FROM events WHERE entity_id = ?1 \
                 ORDER BY timestamp ASC, rowid ASC LIMIT ?2 OFFSET ?3"
            ))?;
            let rows = stmt.query_map(
                params![
                    entity_id.to_string(),
                    i64::from(page.limit),
                    i64::from(page.offset)
                ],
                event_from_row,
            )?;
            rows.collect()
        })
    }

    async fn list(&self, filter: &EventFilter) -> RepoResult<Vec<Event>> {
        let mut sql = format!("SELECT {EVENT_COLUMNS} FROM events WHERE 1 = 1");
        let mut values: Vec<Value> = Vec::new();
        if let Some(event_type) = filter.event_type {
            sql.push_str(" AND event_type = ?");
            values.push(Value::Text(event_type.as_str().to_string()));
        }
        if let Some(location) = filter.location.as_deref() {
            sql.push_str(" AND location LIKE ? ESCAPE '\\'");
            values.push(Value::Text(contains_pattern(location)));
        }
        sql.push_str(" ORDER BY timestamp DESC, rowid DESC LIMIT ? OFFSET ?");
        values.push(Value::Integer(i64::from(filter.page.limit)));
        values.push(Value::Integer(i64::from(filter.page.offset)));

        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(params_from_iter(values.iter()), event_from_row)?;
            rows.collect()
        })
    }

    async fn delete(&self, id: EventId) -> RepoResult<bool> {
        self.with_conn(|conn| {
            let removed = conn.execute("DELETE FROM events WHERE id = ?1", params![id.to_string()])?;
            Ok(removed > 0)
        })
    }
}
