use std::sync::Arc;

use backend_domain::ports::{
    EntityRepository, EventRepository, HealthCheckService, LinkRepository, TrackingRepository,
};
use backend_domain::RuntimeConfig;

use crate::Metrics;

#[derive(Clone)]
pub struct AppState {
    pub config: RuntimeConfig,
    pub entity_repo: Arc<dyn EntityRepository>,
    pub event_repo: Arc<dyn EventRepository>,
    pub link_repo: Arc<dyn LinkRepository>,
    pub tracking_repo: Arc<dyn TrackingRepository>,
    pub health: Arc<dyn HealthCheckService>,
    pub metrics: Arc<Metrics>,
}
