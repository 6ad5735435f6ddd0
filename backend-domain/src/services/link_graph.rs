//! Traversals over the entity link graph.
//!
//! Links are directed `parent -> child` edges. Writes keep the graph acyclic
//! through [`closes_cycle`], run by the store inside the insert transaction;
//! reads bound every walk by a visited set and a depth limit, so a graph
//! corrupted into a cycle still terminates.

use std::collections::{HashSet, VecDeque};

use crate::ports::{LinkRepository, RepoResult};
use crate::value_objects::EntityId;

pub const DEFAULT_TRACE_DEPTH: u32 = 10;
pub const MAX_TRACE_DEPTH: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edge {
    ToParent,
    ToChild,
}

/// Reports whether adding `parent_id -> child_id` would close a cycle, i.e.
/// whether `parent_id` is already reachable from `child_id`. Breadth-first over
/// `children`, which lists the direct children of a node; each node is
/// expanded at most once.
pub fn closes_cycle<E>(
    parent_id: EntityId,
    child_id: EntityId,
    mut children: impl FnMut(EntityId) -> Result<Vec<EntityId>, E>,
) -> Result<bool, E> {
    if parent_id == child_id {
        return Ok(true);
    }
    let mut visited = HashSet::from([child_id]);
    let mut queue = VecDeque::from([child_id]);
    while let Some(current) = queue.pop_front() {
        for next in children(current)? {
            if next == parent_id {
                return Ok(true);
            }
            if visited.insert(next) {
                queue.push_back(next);
            }
        }
    }
    Ok(false)
}

struct Frame {
    neighbors: Vec<EntityId>,
    next: usize,
    depth: u32,
}

pub struct LinkGraph<'a> {
    links: &'a dyn LinkRepository,
}

impl<'a> LinkGraph<'a> {
    pub fn new(links: &'a dyn LinkRepository) -> Self {
        Self { links }
    }

    /// Parents, grandparents, ... of `start` in depth-first discovery order.
    pub async fn ancestors(&self, start: EntityId, max_depth: u32) -> RepoResult<Vec<EntityId>> {
        self.walk(start, max_depth, Edge::ToParent).await
    }

    /// Children, grandchildren, ... of `start` in depth-first discovery order.
    pub async fn descendants(&self, start: EntityId, max_depth: u32) -> RepoResult<Vec<EntityId>> {
        self.walk(start, max_depth, Edge::ToChild).await
    }

    // Pre-order walk with an explicit stack of frames. A node is listed the first
    // time it is reached and never expanded again; nodes at `max_depth` are listed
    // but not expanded.
    async fn walk(&self, start: EntityId, max_depth: u32, edge: Edge) -> RepoResult<Vec<EntityId>> {
        let mut discovered = Vec::new();
        if max_depth == 0 {
            return Ok(discovered);
        }
        let mut visited = HashSet::from([start]);
        let mut frames = vec![Frame {
            neighbors: self.neighbors(start, edge).await?,
            next: 0,
            depth: 1,
        }];

        while let Some(frame) = frames.last_mut() {
            let Some(&id) = frame.neighbors.get(frame.next) else {
                frames.pop();
                continue;
            };
            frame.next += 1;
            let depth = frame.depth;

            if !visited.insert(id) {
                continue;
            }
            discovered.push(id);
            if depth < max_depth {
                let neighbors = self.neighbors(id, edge).await?;
                frames.push(Frame {
                    neighbors,
                    next: 0,
                    depth: depth + 1,
                });
            }
        }
        Ok(discovered)
    }

    async fn neighbors(&self, id: EntityId, edge: Edge) -> RepoResult<Vec<EntityId>> {
        let ids = match edge {
            Edge::ToParent => self
                .links
                .parents_of(id)
                .await?
                .into_iter()
                .map(|link| link.parent_id)
                .collect(),
            Edge::ToChild => self
                .links
                .children_of(id)
                .await?
                .into_iter()
                .map(|link| link.child_id)
                .collect(),
        };
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::entities::{EntityLink, LinkInsert};
    use crate::ports::RepoError;

    #[derive(Default)]
    struct MemoryLinks {
        links: Mutex<Vec<EntityLink>>,
    }

    impl MemoryLinks {
        fn with(edges: &[(EntityId, EntityId)]) -> Self {
            let links = edges
                .iter()
                .map(|(parent_id, child_id)| EntityLink {
                    parent_id: *parent_id,
                    child_id: *child_id,
                    relation: "contains".to_string(),
                })
                .collect();
            Self {
                links: Mutex::new(links),
            }
        }

        fn edges(&self) -> Vec<(EntityId, EntityId)> {
            self.links
                .lock()
                .unwrap()
                .iter()
                .map(|link| (link.parent_id, link.child_id))
                .collect()
        }
    }

    #[async_trait]
    impl LinkRepository for MemoryLinks {
        async fn insert_acyclic(&self, link: &EntityLink) -> RepoResult<LinkInsert> {
            let mut links = self.links.lock().unwrap();
            let cyclic = closes_cycle(link.parent_id, link.child_id, |id| {
                Ok::<_, RepoError>(
                    links
                        .iter()
                        .filter(|edge| edge.parent_id == id)
                        .map(|edge| edge.child_id)
                        .collect(),
                )
            })?;
            if cyclic {
                return Ok(LinkInsert::WouldCycle);
            }
            if links
                .iter()
                .any(|edge| edge.parent_id == link.parent_id && edge.child_id == link.child_id)
            {
                return Ok(LinkInsert::Duplicate);
            }
            links.push(link.clone());
            Ok(LinkInsert::Created)
        }

        async fn children_of(&self, id: EntityId) -> RepoResult<Vec<EntityLink>> {
            Ok(self
                .links
                .lock()
                .unwrap()
                .iter()
                .filter(|link| link.parent_id == id)
                .cloned()
                .collect())
        }

        async fn parents_of(&self, id: EntityId) -> RepoResult<Vec<EntityLink>> {
            Ok(self
                .links
                .lock()
                .unwrap()
                .iter()
                .filter(|link| link.child_id == id)
                .cloned()
                .collect())
        }

        async fn delete(&self, parent_id: EntityId, child_id: EntityId) -> RepoResult<bool> {
            let mut links = self.links.lock().unwrap();
            let before = links.len();
            links.retain(|link| !(link.parent_id == parent_id && link.child_id == child_id));
            Ok(links.len() != before)
        }
    }

    fn ids(n: usize) -> Vec<EntityId> {
        (0..n).map(|_| EntityId::generate()).collect()
    }

    fn is_acyclic(nodes: &[EntityId], edges: &[(EntityId, EntityId)]) -> bool {
        let mut indegree: HashMap<EntityId, usize> = nodes.iter().map(|id| (*id, 0)).collect();
        for (_, child) in edges {
            *indegree.get_mut(child).unwrap() += 1;
        }
        let mut ready: Vec<EntityId> = indegree
            .iter()
            .filter(|(_, degree)| **degree == 0)
            .map(|(id, _)| *id)
            .collect();
        let mut removed = 0;
        while let Some(node) = ready.pop() {
            removed += 1;
            for (parent, child) in edges {
                if *parent == node {
                    let degree = indegree.get_mut(child).unwrap();
                    *degree -= 1;
                    if *degree == 0 {
                        ready.push(*child);
                    }
                }
            }
        }
        removed == nodes.len()
    }

    fn children_in(edges: &[(EntityId, EntityId)]) -> impl FnMut(EntityId) -> Result<Vec<EntityId>, RepoError> + '_ {
        move |id| {
            Ok(edges
                .iter()
                .filter(|(parent, _)| *parent == id)
                .map(|(_, child)| *child)
                .collect())
        }
    }

    #[test]
    fn self_link_counts_as_cycle() {
        let n = ids(1);
        assert!(closes_cycle(n[0], n[0], children_in(&[])).unwrap());
    }

    #[test]
    fn closing_edge_is_detected_but_shortcut_is_not() {
        let n = ids(3);
        let edges = [(n[0], n[1]), (n[1], n[2])];

        assert!(closes_cycle(n[2], n[0], children_in(&edges)).unwrap());
        assert!(closes_cycle(n[1], n[0], children_in(&edges)).unwrap());
        assert!(!closes_cycle(n[0], n[2], children_in(&edges)).unwrap());
    }

    #[test]
    fn shared_descendants_are_expanded_once() {
        let n = ids(4);
        let (top, left, right, bottom) = (n[0], n[1], n[2], n[3]);
        let edges = [(top, left), (top, right), (left, bottom), (right, bottom)];
        let mut expanded = Vec::new();
        let cyclic = closes_cycle(bottom, top, |id| {
            expanded.push(id);
            children_in(&edges)(id)
        })
        .unwrap();

        assert!(cyclic);
        let unrelated = EntityId::generate();
        expanded.clear();
        assert!(!closes_cycle(unrelated, top, |id| {
            expanded.push(id);
            children_in(&edges)(id)
        })
        .unwrap());
        assert_eq!(expanded.len(), 4);
    }

    #[tokio::test]
    async fn guarded_inserts_keep_graph_acyclic() {
        let n = ids(6);
        let links = MemoryLinks::default();
        let mut created = 0;

        for (i, parent) in n.iter().enumerate() {
            for (j, child) in n.iter().enumerate() {
                if i == j {
                    continue;
                }
                // Alternate direction so both forward and backward edges are attempted.
                let (parent, child) = if (i + j) % 2 == 0 { (parent, child) } else { (child, parent) };
                let outcome = links
                    .insert_acyclic(&EntityLink {
                        parent_id: *parent,
                        child_id: *child,
                        relation: "contains".to_string(),
                    })
                    .await
                    .unwrap();
                if outcome == LinkInsert::Created {
                    created += 1;
                }
                assert!(is_acyclic(&n, &links.edges()));
            }
        }
        assert!(created > 0);
        assert_eq!(links.edges().len(), created);
    }

    #[tokio::test]
    async fn depth_one_returns_only_direct_neighbour() {
        let n = ids(3);
        let links = MemoryLinks::with(&[(n[0], n[1]), (n[1], n[2])]);
        let graph = LinkGraph::new(&links);

        assert_eq!(graph.ancestors(n[2], 1).await.unwrap(), vec![n[1]]);
        assert_eq!(graph.descendants(n[0], 1).await.unwrap(), vec![n[1]]);
        assert_eq!(graph.ancestors(n[2], 10).await.unwrap(), vec![n[1], n[0]]);
        assert_eq!(graph.descendants(n[0], 10).await.unwrap(), vec![n[1], n[2]]);
    }

    #[tokio::test]
    async fn parent_is_listed_before_grandparent() {
        // d has parents p1 and p2; p1 has parent g.
        let n = ids(4);
        let (d, p1, p2, g) = (n[0], n[1], n[2], n[3]);
        let links = MemoryLinks::with(&[(p1, d), (p2, d), (g, p1)]);
        let graph = LinkGraph::new(&links);

        assert_eq!(graph.ancestors(d, 10).await.unwrap(), vec![p1, g, p2]);
    }

    #[tokio::test]
    async fn diamond_nodes_are_listed_once() {
        let n = ids(4);
        let (top, left, right, bottom) = (n[0], n[1], n[2], n[3]);
        let links = MemoryLinks::with(&[(top, left), (top, right), (left, bottom), (right, bottom)]);
        let graph = LinkGraph::new(&links);

        assert_eq!(graph.descendants(top, 10).await.unwrap(), vec![left, bottom, right]);
        assert_eq!(graph.ancestors(bottom, 10).await.unwrap(), vec![left, top, right]);
    }

    #[tokio::test]
    async fn corrupt_cycle_terminates() {
        let n = ids(3);
        let links = MemoryLinks::with(&[(n[0], n[1]), (n[1], n[2]), (n[2], n[0])]);
        let graph = LinkGraph::new(&links);

        assert_eq!(
            graph.descendants(n[0], MAX_TRACE_DEPTH).await.unwrap(),
            vec![n[1], n[2]]
        );
        assert_eq!(
            graph.ancestors(n[0], MAX_TRACE_DEPTH).await.unwrap(),
            vec![n[2], n[1]]
        );
    }

    #[tokio::test]
    async fn isolated_entity_has_no_relatives() {
        let n = ids(1);
        let links = MemoryLinks::default();
        let graph = LinkGraph::new(&links);

        assert!(graph.ancestors(n[0], DEFAULT_TRACE_DEPTH).await.unwrap().is_empty());
        assert!(graph.descendants(n[0], DEFAULT_TRACE_DEPTH).await.unwrap().is_empty());
    }
}
