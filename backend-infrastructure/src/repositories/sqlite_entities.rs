use async_trait::async_trait;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, OptionalExtension};

use backend_domain::{
    DependentCounts, Entity, EntityDeletion, EntityFilter, EntityId, EntityRepository, Event,
    RepoResult,
};

use super::sqlite_store::{encode_json, entity_from_row, insert_event_row, SqliteStore, ENTITY_COLUMNS};
use crate::utils::{contains_pattern, format_timestamp};

#[async_trait]
impl EntityRepository for SqliteStore {
    async fn insert(&self, entity: &Entity, initial_events: &[Event]) -> RepoResult<()> {
        self.with_conn(|conn| {
            let tx = conn.transaction()?;
            tx.execute(
                &format!("INSERT INTO entities ({ENTITY_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5)"),
                params![
                    entity.id.to_string(),
                    entity.entity_type.as_str(),
                    entity.external_id,
                    encode_json(&entity.extra_data)?,
                    format_timestamp(entity.created_at),
                ],
            )?;
            for event in initial_events {
                insert_event_row(&tx, event)?;
            }
            tx.commit()
        })
    }

    async fn find_by_id(&self, id: EntityId) -> RepoResult<Option<Entity>> {
        self.with_conn(|conn| {
            conn.query_row(
                &format!("SELECT {ENTITY_COLUMNS} FROM entities WHERE id = ?1"),
                params![id.to_string()],
                entity_from_row,
            )
            .optional()
        })
    }

    async fn find_by_external_id(&self, external_id: &str) -> RepoResult<Option<Entity>> {
        self.with_conn(|conn| {
            conn.query_row(
                &format!("SELECT {ENTITY_COLUMNS} FROM entities WHERE external_id = ?1"),
                params![external_id],
                entity_from_row,
            )
            .optional()
        })
    }

    async fn find_many(&self, ids: &[EntityId]) -> RepoResult<Vec<Entity>> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare_cached(&format!("SELECT {ENTITY_COLUMNS} FROM entities WHERE id = ?1"))?;
            let mut found = Vec::with_capacity(ids.len());
            for id in ids {
                if let Some(entity) = stmt
                    .query_row(params![id.to_string()], entity_from_row)
                    .optional()?
                {
                    found.push(entity);
                }
            }
            Ok(found)
        })
    }

    async fn list(&self, filter: &EntityFilter) -> RepoResult<Vec<Entity>> {
        let mut sql = format!("SELECT {ENTITY_COLUMNS} FROM entities WHERE 1 = 1");
        let mut values: Vec<Value> = Vec::new();
        if let Some(entity_type) = filter.entity_type {
            sql.push_str(" AND type = ?");
            values.push(Value::Text(entity_type.as_str().to_string()));
        }
        if let Some(search) = filter.search.as_deref() {
            let pattern = contains_pattern(search);
            sql.push_str(" AND (external_id LIKE ? ESCAPE '\\' OR type LIKE ? ESCAPE '\\')");
            values.push(Value::Text(pattern.clone()));
            values.push(Value::Text(pattern));
        }
        sql.push_str(" ORDER BY created_at DESC, rowid DESC LIMIT ? OFFSET ?");
        values.push(Value::Integer(i64::from(filter.page.limit)));
        values.push(Value::Integer(i64::from(filter.page.offset)));

        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(params_from_iter(values.iter()), entity_from_row)?;
            rows.collect()
        })
    }

    async fn update(&self, entity: &Entity) -> RepoResult<bool> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE entities SET type = ?2, external_id = ?3, extra_data = ?4 WHERE id = ?1",
                params![
                    entity.id.to_string(),
                    entity.entity_type.as_str(),
                    entity.external_id,
                    encode_json(&entity.extra_data)?,
                ],
            )?;
            Ok(changed > 0)
        })
    }

    async fn delete(&self, id: EntityId, force: bool) -> RepoResult<EntityDeletion> {
        let id = id.to_string();
        self.with_conn(|conn| {
            let tx = conn.transaction()?;
            let exists = tx
                .query_row("SELECT 1 FROM entities WHERE id = ?1", params![id], |_| Ok(()))
                .optional()?
                .is_some();
            if !exists {
                return Ok(EntityDeletion::NotFound);
            }
            let events: i64 = tx.query_row(
                "SELECT COUNT(*) FROM events WHERE entity_id = ?1",
                params![id],
                |row| row.get(0),
            )?;
            let links: i64 = tx.query_row(
                "SELECT COUNT(*) FROM entity_links WHERE parent_id = ?1 OR child_id = ?1",
                params![id],
                |row| row.get(0),
            )?;
            let counts = DependentCounts {
                events: events as u64,
                links: links as u64,
            };
            if !force && !counts.is_empty() {
                return Ok(EntityDeletion::Blocked(counts));
            }
            tx.execute("DELETE FROM events WHERE entity_id = ?1", params![id])?;
            tx.execute(
                "DELETE FROM entity_links WHERE parent_id = ?1 OR child_id = ?1",
                params![id],
            )?;
            tx.execute("DELETE FROM entities WHERE id = ?1", params![id])?;
            tx.commit()?;
            Ok(EntityDeletion::Deleted(counts))
        })
    }

    async fn ping(&self) -> RepoResult<()> {
        self.with_conn(|conn| conn.query_row("SELECT 1", [], |_| Ok(())))
    }
}
