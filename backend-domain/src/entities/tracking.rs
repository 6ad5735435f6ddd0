// Package tracking views
// Package-centric projections of entities of type `package` and their events

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::{Entity, Event};
use crate::value_objects::{EntityId, EntityType, JsonMap, PackageStatus};

#[derive(Debug, Clone, Deserialize)]
pub struct PackageCreateRequest {
    pub tracking_number: String,
    pub sender: String,
    pub recipient: String,
    pub destination: String,
    #[serde(default)]
    pub weight_kg: Option<f64>,
    #[serde(default)]
    pub extra_data: Option<JsonMap>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PackageEventRequest {
    pub status: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub actor: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub extra_data: Option<JsonMap>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PackageListQuery {
    pub status: Option<String>,
    pub skip: Option<u32>,
    pub limit: Option<u32>,
}

/// A package entity joined with its most recent event.
#[derive(Debug, Clone, PartialEq)]
pub struct PackageRecord {
    pub entity: Entity,
    pub latest_event: Option<Event>,
}

impl PackageRecord {
    pub fn current_status(&self) -> PackageStatus {
        self.latest_event
            .as_ref()
            .map(|event| event.event_type)
            .unwrap_or(PackageStatus::Created)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PackageDetails {
    pub id: EntityId,
    #[serde(rename = "type")]
    pub entity_type: EntityType,
    pub details: JsonMap,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TimelineEvent {
    pub status: PackageStatus,
    pub location: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub actor: Option<String>,
    pub details: Option<JsonMap>,
}

impl From<&Event> for TimelineEvent {
    fn from(event: &Event) -> Self {
        Self {
            status: event.event_type,
            location: event.location.clone(),
            timestamp: event.timestamp,
            actor: event.actor.clone(),
            details: event.payload.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TrackingResponse {
    pub tracking_number: String,
    pub package: PackageDetails,
    pub status: PackageStatus,
    pub current_location: Option<String>,
    pub timeline: Vec<TimelineEvent>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PackageSummary {
    pub tracking_number: String,
    pub id: EntityId,
    pub current_status: PackageStatus,
    pub current_location: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
    pub details: JsonMap,
}

impl From<PackageRecord> for PackageSummary {
    fn from(record: PackageRecord) -> Self {
        let current_status = record.current_status();
        let PackageRecord {
            entity,
            latest_event,
        } = record;
        Self {
            tracking_number: entity.external_id,
            id: entity.id,
            current_status,
            current_location: latest_event.as_ref().and_then(|event| event.location.clone()),
            created_at: entity.created_at,
            last_updated: latest_event
                .as_ref()
                .map(|event| event.timestamp)
                .unwrap_or(entity.created_at),
            details: entity.extra_data,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TrackingStats {
    pub total_packages: u64,
    pub status_distribution: BTreeMap<String, u64>,
    pub total_events: u64,
}
