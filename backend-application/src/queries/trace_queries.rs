use std::collections::HashMap;

use backend_domain::services::LinkGraph;
use backend_domain::{
    Entity, EntityId, EntityLink, EntitySummary, EntityTree, TraceCount, TraceDirection,
    TraceQuery, TraceResult, TreeNeighbor,
};

use crate::queries::entity_queries;
use crate::validation::non_blank;
use crate::AppError;
use crate::AppState;

fn resolve_depth(state: &AppState, requested: Option<u32>) -> Result<u32, AppError> {
    let max = state.config.max_trace_depth;
    let depth = requested.unwrap_or(state.config.default_trace_depth);
    if depth == 0 || depth > max {
        return Err(AppError::BadRequest(format!(
            "max_depth must be between 1 and {}",
            max
        )));
    }
    Ok(depth)
}

async fn summaries(state: &AppState, ids: &[EntityId]) -> Result<Vec<EntitySummary>, AppError> {
    let entities = state.entity_repo.find_many(ids).await?;
    Ok(entities.iter().map(Entity::summary).collect())
}

/// Walks the link graph around `id` in the requested direction, bounded by `max_depth`.
pub async fn trace_entity(
    state: &AppState,
    id: EntityId,
    query: TraceQuery,
) -> Result<TraceResult, AppError> {
    let direction = match non_blank(query.direction) {
        Some(raw) => raw
            .parse::<TraceDirection>()
            .map_err(|err| AppError::BadRequest(err.to_string()))?,
        None => TraceDirection::default(),
    };
    let max_depth = resolve_depth(state, query.max_depth)?;
    let entity = entity_queries::get_entity(state, id).await?;

    let graph = LinkGraph::new(state.link_repo.as_ref());
    let ancestors = if direction.includes_ancestors() {
        let ids = graph.ancestors(entity.id, max_depth).await?;
        summaries(state, &ids).await?
    } else {
        Vec::new()
    };
    let descendants = if direction.includes_descendants() {
        let ids = graph.descendants(entity.id, max_depth).await?;
        summaries(state, &ids).await?
    } else {
        Vec::new()
    };

    let count = TraceCount {
        ancestors: ancestors.len(),
        descendants: descendants.len(),
    };
    Ok(TraceResult {
        entity,
        ancestors,
        descendants,
        count,
    })
}

async fn neighbors(
    state: &AppState,
    links: Vec<EntityLink>,
    pick: impl Fn(&EntityLink) -> EntityId,
) -> Result<Vec<TreeNeighbor>, AppError> {
    let ids: Vec<EntityId> = links.iter().map(&pick).collect();
    let entities: HashMap<EntityId, Entity> = state
        .entity_repo
        .find_many(&ids)
        .await?
        .into_iter()
        .map(|entity| (entity.id, entity))
        .collect();
    Ok(links
        .into_iter()
        .filter_map(|link| {
            let entity = entities.get(&pick(&link))?;
            Some(TreeNeighbor {
                id: entity.id,
                entity_type: entity.entity_type,
                external_id: entity.external_id.clone(),
                relation: link.relation,
            })
        })
        .collect())
}

/// The entity with its direct parents and children.
pub async fn entity_tree(state: &AppState, id: EntityId) -> Result<EntityTree, AppError> {
    let entity = entity_queries::get_entity(state, id).await?;
    let parent_links = state.link_repo.parents_of(entity.id).await?;
    let child_links = state.link_repo.children_of(entity.id).await?;
    Ok(EntityTree {
        parents: neighbors(state, parent_links, |link| link.parent_id).await?,
        children: neighbors(state, child_links, |link| link.child_id).await?,
        entity: entity.summary(),
    })
}
