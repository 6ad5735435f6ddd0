use backend_domain::{
    Entity, EntityType, Page, PackageDetails, PackageListQuery, PackageStatus, PackageSummary,
    TimelineEvent, TrackingResponse, TrackingStats,
};

use crate::validation::{non_blank, parse_status};
use crate::AppError;
use crate::AppState;

/// Looks up a `package` entity by tracking number; other entity types do not match.
pub async fn find_package(state: &AppState, tracking_number: &str) -> Result<Entity, AppError> {
    state
        .entity_repo
        .find_by_external_id(tracking_number)
        .await?
        .filter(|entity| entity.entity_type == EntityType::Package)
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "package with tracking number {} not found",
                tracking_number
            ))
        })
}

pub async fn track_package(
    state: &AppState,
    tracking_number: &str,
) -> Result<TrackingResponse, AppError> {
    let package = find_package(state, tracking_number).await?;
    let events = state
        .event_repo
        .list_for_entity(package.id, Page::unbounded())
        .await?;

    let latest = events.last();
    let status = latest
        .map(|event| event.event_type)
        .unwrap_or(PackageStatus::Created);
    let current_location = latest.and_then(|event| event.location.clone());
    let timeline = events.iter().map(TimelineEvent::from).collect();

    Ok(TrackingResponse {
        tracking_number: package.external_id,
        package: PackageDetails {
            id: package.id,
            entity_type: package.entity_type,
            details: package.extra_data,
            created_at: package.created_at,
        },
        status,
        current_location,
        timeline,
    })
}

pub async fn list_packages(
    state: &AppState,
    query: PackageListQuery,
) -> Result<Vec<PackageSummary>, AppError> {
    let status = non_blank(query.status)
        .map(|raw| parse_status(&raw))
        .transpose()?;
    let page = Page::resolve(
        query.skip,
        query.limit,
        state.config.default_page_size,
        state.config.max_page_size,
    );
    let records = state.tracking_repo.list_packages(status, page).await?;
    Ok(records.into_iter().map(PackageSummary::from).collect())
}

pub async fn tracking_stats(state: &AppState) -> Result<TrackingStats, AppError> {
    Ok(state.tracking_repo.stats().await?)
}
