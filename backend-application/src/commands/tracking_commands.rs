use serde_json::{json, Value};
use tracing::info;

use backend_domain::{
    Entity, EntityType, Event, JsonMap, PackageCreateRequest, PackageEventRequest, PackageStatus,
    RepoError,
};

use crate::queries::tracking_queries;
use crate::validation::{non_blank, parse_status, required_text};
use crate::AppError;
use crate::AppState;

const SYSTEM_ACTOR: &str = "system";

fn duplicate_tracking_number(tracking_number: &str) -> AppError {
    AppError::Conflict(format!("tracking number {} already exists", tracking_number))
}

/// Creates a package entity and its initial `created` event in one write.
pub async fn create_package(
    state: &AppState,
    request: PackageCreateRequest,
) -> Result<Entity, AppError> {
    let tracking_number = required_text("tracking_number", Some(&request.tracking_number))?;
    if state
        .entity_repo
        .find_by_external_id(&tracking_number)
        .await?
        .is_some()
    {
        return Err(duplicate_tracking_number(&tracking_number));
    }

    let mut details = JsonMap::new();
    details.insert("sender".to_string(), Value::String(request.sender));
    details.insert("recipient".to_string(), Value::String(request.recipient));
    details.insert("destination".to_string(), Value::String(request.destination));
    if let Some(weight_kg) = request.weight_kg {
        details.insert("weight_kg".to_string(), json!(weight_kg));
    }
    // Caller-supplied keys win over the named fields.
    details.extend(request.extra_data.unwrap_or_default());

    let package = Entity::new(EntityType::Package, tracking_number, details);
    let mut payload = JsonMap::new();
    payload.insert(
        "tracking_number".to_string(),
        Value::String(package.external_id.clone()),
    );
    let created = Event::new(
        package.id,
        PackageStatus::Created,
        None,
        Some(SYSTEM_ACTOR.to_string()),
        Some(payload),
    );

    if let Err(err) = state.entity_repo.insert(&package, &[created]).await {
        return Err(match err {
            RepoError::Conflict(_) => duplicate_tracking_number(&package.external_id),
            other => other.into(),
        });
    }
    state.metrics.record_entity_created();
    state.metrics.record_events(1);
    info!(
        entity_id = %package.id,
        tracking_number = %package.external_id,
        "package created"
    );
    Ok(package)
}

pub async fn add_package_event(
    state: &AppState,
    tracking_number: &str,
    request: PackageEventRequest,
) -> Result<Event, AppError> {
    let status = parse_status(&request.status)?;
    let package = tracking_queries::find_package(state, tracking_number).await?;

    let mut payload = JsonMap::new();
    if let Some(notes) = non_blank(request.notes) {
        payload.insert("notes".to_string(), Value::String(notes));
    }
    payload.extend(request.extra_data.unwrap_or_default());

    let event = Event::new(
        package.id,
        status,
        non_blank(request.location),
        non_blank(request.actor),
        (!payload.is_empty()).then_some(payload),
    );
    state.event_repo.insert(&event).await?;
    state.metrics.record_events(1);
    info!(
        event_id = %event.id,
        tracking_number = %package.external_id,
        status = %event.event_type,
        "package event recorded"
    );
    Ok(event)
}
