use std::sync::Arc;

use async_trait::async_trait;
use backend_domain::ports::HealthCheckService;
use backend_domain::EntityRepository;

pub struct DefaultHealthService {
    entity_repo: Arc<dyn EntityRepository>,
}

impl DefaultHealthService {
    pub fn new(entity_repo: Arc<dyn EntityRepository>) -> Self {
        Self { entity_repo }
    }
}

#[async_trait]
impl HealthCheckService for DefaultHealthService {
    async fn check_database(&self) -> anyhow::Result<()> {
        self.entity_repo.ping().await.map_err(anyhow::Error::from)
    }
}
