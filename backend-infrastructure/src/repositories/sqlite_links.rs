use async_trait::async_trait;
use rusqlite::{params, OptionalExtension, TransactionBehavior};

use backend_domain::services::closes_cycle;
use backend_domain::{EntityId, EntityLink, LinkInsert, LinkRepository, RepoResult};

use super::sqlite_store::{link_from_row, SqliteStore, LINK_COLUMNS};

impl SqliteStore {
    fn links_where(&self, column: &str, id: EntityId) -> RepoResult<Vec<EntityLink>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {LINK_COLUMNS} FROM entity_links WHERE {column} = ?1 ORDER BY rowid ASC"
            ))?;
            let rows = stmt.query_map(params![id.to_string()], link_from_row)?;
            rows.collect()
        })
    }
}

#[async_trait]
impl LinkRepository for SqliteStore {
    async fn insert_acyclic(&self, link: &EntityLink) -> RepoResult<LinkInsert> {
        self.with_conn(|conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            let cyclic = {
                let mut children = tx.prepare(&format!(
                    "SELECT {LINK_COLUMNS} FROM entity_links WHERE parent_id = ?1 ORDER BY rowid ASC"
                ))?;
                closes_cycle(link.parent_id, link.child_id, |id| {
                    children
                        .query_map(params![id.to_string()], link_from_row)?
                        .map(|row| row.map(|edge| edge.child_id))
                        .collect::<rusqlite::Result<Vec<_>>>()
                })?
            };
            if cyclic {
                return Ok(LinkInsert::WouldCycle);
            }
            let duplicate = tx
                .query_row(
                    "SELECT 1 FROM entity_links WHERE parent_id = ?1 AND child_id = ?2",
                    params![link.parent_id.to_string(), link.child_id.to_string()],
                    |_| Ok(()),
                )
                .optional()?
                .is_some();
            if duplicate {
                return Ok(LinkInsert::Duplicate);
            }
            tx.execute(
                &format!("INSERT INTO entity_links ({LINK_COLUMNS}) VALUES (?1, ?2, ?3)"),
                params![
                    link.parent_id.to_string(),
                    link.child_id.to_string(),
                    link.relation
                ],
            )?;
            tx.commit()?;
            Ok(LinkInsert::Created)
        })
    }

    async fn children_of(&self, id: EntityId) -> RepoResult<Vec<EntityLink>> {
        self.links_where("parent_id", id)
    }

    async fn parents_of(&self, id: EntityId) -> RepoResult<Vec<EntityLink>> {
        self.links_where("child_id", id)
    }

    async fn delete(&self, parent_id: EntityId, child_id: EntityId) -> RepoResult<bool> {
        self.with_conn(|conn| {
            let removed = conn.execute(
                "DELETE FROM entity_links WHERE parent_id = ?1 AND child_id = ?2",
                params![parent_id.to_string(), child_id.to_string()],
            )?;
            Ok(removed > 0)
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use backend_domain::{Entity, EntityRepository, EntityType, JsonMap};

    use super::*;

    async fn seeded(names: &[&str]) -> (SqliteStore, Vec<EntityId>) {
        let store = SqliteStore::open_in_memory().unwrap();
        let mut ids = Vec::new();
        for name in names {
            let entity = Entity::new(EntityType::Container, name.to_string(), JsonMap::new());
            EntityRepository::insert(&store, &entity, &[]).await.unwrap();
            ids.push(entity.id);
        }
        (store, ids)
    }

    fn link(parent_id: EntityId, child_id: EntityId) -> EntityLink {
        EntityLink {
            parent_id,
            child_id,
            relation: "contains".to_string(),
        }
    }

    #[tokio::test]
    async fn neighbors_come_back_in_insertion_order() {
        let (store, ids) = seeded(&["P", "C1", "C2", "C3"]).await;
        for child in [ids[3], ids[1], ids[2]] {
            store.insert_acyclic(&link(ids[0], child)).await.unwrap();
        }

        let children: Vec<_> = store
            .children_of(ids[0])
            .await
            .unwrap()
            .into_iter()
            .map(|l| l.child_id)
            .collect();
        assert_eq!(children, vec![ids[3], ids[1], ids[2]]);

        let parents = store.parents_of(ids[1]).await.unwrap();
        assert_eq!(parents, vec![link(ids[0], ids[1])]);
    }

    #[tokio::test]
    async fn guarded_insert_reports_duplicates_and_cycles() {
        let (store, ids) = seeded(&["A", "B", "C"]).await;
        let (a, b, c) = (ids[0], ids[1], ids[2]);
        assert_eq!(store.insert_acyclic(&link(a, b)).await.unwrap(), LinkInsert::Created);
        assert_eq!(store.insert_acyclic(&link(b, c)).await.unwrap(), LinkInsert::Created);

        assert_eq!(store.insert_acyclic(&link(a, b)).await.unwrap(), LinkInsert::Duplicate);
        assert_eq!(store.insert_acyclic(&link(c, a)).await.unwrap(), LinkInsert::WouldCycle);
        assert_eq!(store.insert_acyclic(&link(a, a)).await.unwrap(), LinkInsert::WouldCycle);
        assert_eq!(store.insert_acyclic(&link(a, c)).await.unwrap(), LinkInsert::Created);
        assert_eq!(store.children_of(a).await.unwrap().len(), 2);
        assert!(store.children_of(c).await.unwrap().is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_reverse_links_admit_one_edge() {
        for _ in 0..50 {
            let (store, ids) = seeded(&["A", "B"]).await;
            let store = Arc::new(store);
            let (a, b) = (ids[0], ids[1]);
            let forward = tokio::spawn({
                let store = store.clone();
                async move { store.insert_acyclic(&link(a, b)).await.unwrap() }
            });
            let backward = tokio::spawn({
                let store = store.clone();
                async move { store.insert_acyclic(&link(b, a)).await.unwrap() }
            });
            let outcomes = [forward.await.unwrap(), backward.await.unwrap()];

            assert_eq!(
                outcomes.iter().filter(|o| **o == LinkInsert::Created).count(),
                1
            );
            assert!(outcomes.contains(&LinkInsert::WouldCycle));
        }
    }

    #[tokio::test]
    async fn delete_removes_only_the_pair() {
        let (store, ids) = seeded(&["A", "B", "C"]).await;
        store.insert_acyclic(&link(ids[0], ids[1])).await.unwrap();
        store.insert_acyclic(&link(ids[0], ids[2])).await.unwrap();

        assert!(LinkRepository::delete(&store, ids[0], ids[1]).await.unwrap());
        assert!(!LinkRepository::delete(&store, ids[0], ids[1]).await.unwrap());
        assert_eq!(store.children_of(ids[0]).await.unwrap().len(), 1);
    }
}
