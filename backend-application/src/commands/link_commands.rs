use tracing::{info, warn};

use backend_domain::{
    EntityLink, LinkCreateRequest, LinkDeleteQuery, LinkDeleted, LinkInsert, RepoError,
};

use crate::validation::required_text;
use crate::AppError;
use crate::AppState;

fn reject(state: &AppState, request: &LinkCreateRequest, err: AppError) -> AppError {
    state.metrics.record_link_rejected();
    warn!(
        parent_id = %request.parent_id,
        child_id = %request.child_id,
        reason = %err,
        "link rejected"
    );
    err
}

/// Adds a `parent -> child` edge, keeping the link graph free of self-loops,
/// cycles and duplicate pairs.
pub async fn create_link(
    state: &AppState,
    request: LinkCreateRequest,
) -> Result<EntityLink, AppError> {
    if request.parent_id == request.child_id {
        let err = AppError::BadRequest("cannot create self-referential link".to_string());
        return Err(reject(state, &request, err));
    }
    let relation = required_text("relation", Some(&request.relation))?;

    let parent = state.entity_repo.find_by_id(request.parent_id).await?;
    let child = state.entity_repo.find_by_id(request.child_id).await?;
    if parent.is_none() || child.is_none() {
        return Err(AppError::NotFound(
            "parent or child entity not found".to_string(),
        ));
    }

    let link = EntityLink {
        parent_id: request.parent_id,
        child_id: request.child_id,
        relation,
    };
    let rejection = match state.link_repo.insert_acyclic(&link).await {
        Ok(LinkInsert::Created) => None,
        Ok(LinkInsert::WouldCycle) => Some(AppError::BadRequest(
            "would create circular relationship".to_string(),
        )),
        Ok(LinkInsert::Duplicate) | Err(RepoError::Conflict(_)) => {
            Some(AppError::Conflict("link already exists".to_string()))
        }
        Err(other) => return Err(other.into()),
    };
    if let Some(err) = rejection {
        return Err(reject(state, &request, err));
    }
    state.metrics.record_link_created();
    info!(
        parent_id = %link.parent_id,
        child_id = %link.child_id,
        relation = %link.relation,
        "link created"
    );
    Ok(link)
}

pub async fn delete_link(state: &AppState, query: LinkDeleteQuery) -> Result<LinkDeleted, AppError> {
    if !state.link_repo.delete(query.parent_id, query.child_id).await? {
        return Err(AppError::NotFound("link not found".to_string()));
    }
    info!(parent_id = %query.parent_id, child_id = %query.child_id, "link deleted");
    Ok(LinkDeleted {
        status: "deleted",
        parent_id: query.parent_id,
        child_id: query.child_id,
    })
}
