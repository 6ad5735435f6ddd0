use std::collections::BTreeMap;

use async_trait::async_trait;
use rusqlite::types::Value;
use rusqlite::{params_from_iter, OptionalExtension};

use backend_domain::{
    EntityType, Page, PackageRecord, PackageStatus, RepoResult, TrackingRepository, TrackingStats,
};

use super::sqlite_store::{entity_from_row, event_from_row, SqliteStore, ENTITY_COLUMNS, EVENT_COLUMNS};

// Status of a package row `e`: its latest event type, or `created` before any event.
const CURRENT_STATUS: &str = "COALESCE((SELECT ev.event_type FROM events ev \
     WHERE ev.entity_id = e.id ORDER BY ev.timestamp DESC, ev.rowid DESC LIMIT 1), 'created')";

#[async_trait]
impl TrackingRepository for SqliteStore {
    async fn list_packages(
        &self,
        status: Option<PackageStatus>,
        page: Page,
    ) -> RepoResult<Vec<PackageRecord>> {
        let columns = ENTITY_COLUMNS
            .split(", ")
            .map(|column| format!("e.{column}"))
            .collect::<Vec<_>>()
            .join(", ");
        let mut sql = format!("SELECT {columns} FROM entities e WHERE e.type = ?");
        let mut values = vec![Value::Text(EntityType::Package.as_str().to_string())];
        if let Some(status) = status {
            sql.push_str(&format!(" AND {CURRENT_STATUS} = ?"));
            values.push(Value::Text(status.as_str().to_string()));
        }
        sql.push_str(" ORDER BY e.created_at DESC, e.rowid DESC LIMIT ? OFFSET ?");
        values.push(Value::Integer(i64::from(page.limit)));
        values.push(Value::Integer(i64::from(page.offset)));

        self.with_conn(|conn| {
            let entities = {
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt.query_map(params_from_iter(values.iter()), entity_from_row)?;
                rows.collect::<rusqlite::Result<Vec<_>>>()?
            };
            let mut latest = conn.prepare_cached(&format!(
                "SELECT {EVENT_COLUMNS} FROM events WHERE entity_id = ?1 \
                 ORDER BY timestamp DESC, rowid DESC LIMIT 1"
            ))?;
            let mut records = Vec::with_capacity(entities.len());
            for entity in entities {
                let latest_event = latest
                    .query_row([entity.id.to_string()], event_from_row)
                    .optional()?;
                records.push(PackageRecord {
                    entity,
                    latest_event,
                });
            }
            Ok(records)
        })
    }

    async fn stats(&self) -> RepoResult<TrackingStats> {
        self.with_conn(|conn| {
            let package = EntityType::Package.as_str();
            let total_packages: i64 = conn.query_row(
                "SELECT COUNT(*) FROM entities WHERE type = ?1",
                [package],
                |row| row.get(0),
            )?;
            let total_events: i64 =
                conn.query_row("SELECT COUNT(*) FROM events", [], |row| row.get(0))?;
            let mut stmt = conn.prepare(&format!(
                "SELECT {CURRENT_STATUS} AS status, COUNT(*) FROM entities e \
                 WHERE e.type = ?1 GROUP BY status"
            ))?;
            let rows = stmt.query_map([package], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
            })?;
            let mut status_distribution = BTreeMap::new();
            for row in rows {
                let (status, count) = row?;
                status_distribution.insert(status, count as u64);
            }
            Ok(TrackingStats {
                total_packages: total_packages as u64,
                status_distribution,
                total_events: total_events as u64,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use backend_domain::{Entity, EntityRepository, Event, EventRepository, JsonMap};

    use super::*;

    async fn package(store: &SqliteStore, tracking_number: &str, statuses: &[PackageStatus]) -> Entity {
        let entity = Entity::new(EntityType::Package, tracking_number.to_string(), JsonMap::new());
        EntityRepository::insert(store, &entity, &[]).await.unwrap();
        for status in statuses {
            let event = Event::new(entity.id, *status, Some("Hub".to_string()), None, None);
            EventRepository::insert(store, &event).await.unwrap();
        }
        entity
    }

    #[tokio::test]
    async fn status_filter_applies_before_paging() {
        let store = SqliteStore::open_in_memory().unwrap();
        let delivered = package(&store, "TRK-1", &[PackageStatus::Created, PackageStatus::Delivered]).await;
        package(&store, "TRK-2", &[PackageStatus::Created]).await;
        package(&store, "TRK-3", &[PackageStatus::Created, PackageStatus::InTransit]).await;
        let container = Entity::new(EntityType::Container, "BOX".to_string(), JsonMap::new());
        EntityRepository::insert(&store, &container, &[]).await.unwrap();

        let first = store
            .list_packages(Some(PackageStatus::Delivered), Page { offset: 0, limit: 1 })
            .await
            .unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].entity.id, delivered.id);
        assert_eq!(first[0].current_status(), PackageStatus::Delivered);

        let all = store.list_packages(None, Page::unbounded()).await.unwrap();
        let numbers: Vec<_> = all.iter().map(|r| r.entity.external_id.as_str()).collect();
        assert_eq!(numbers, vec!["TRK-3", "TRK-2", "TRK-1"]);
    }

    #[tokio::test]
    async fn packages_without_events_count_as_created() {
        let store = SqliteStore::open_in_memory().unwrap();
        package(&store, "TRK-1", &[]).await;
        package(&store, "TRK-2", &[PackageStatus::Created]).await;
        package(&store, "TRK-3", &[PackageStatus::Created, PackageStatus::Delivered]).await;

        let created = store
            .list_packages(Some(PackageStatus::Created), Page::unbounded())
            .await
            .unwrap();
        assert_eq!(created.len(), 2);

        let stats = store.stats().await.unwrap();
        assert_eq!(stats.total_packages, 3);
        assert_eq!(stats.total_events, 3);
        assert_eq!(stats.status_distribution.get("created"), Some(&2));
        assert_eq!(stats.status_distribution.get("delivered"), Some(&1));
    }

    #[tokio::test]
    async fn empty_store_has_zero_stats() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert_eq!(store.stats().await.unwrap(), TrackingStats::default());
    }
}
