use std::env;
use std::path::Path;

use anyhow::{anyhow, Result};
use serde::Deserialize;
use tokio::fs;
use tracing::warn;

use backend_domain::{DbConfig, RuntimeConfig, DEFAULT_TRACE_DEPTH, MAX_TRACE_DEPTH};

pub const CONFIG_PATH_ENV: &str = "TRACELET_CONFIG";
const IN_MEMORY_DATABASE: &str = ":memory:";

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub bind_addr: String,
    pub api_token: Option<String>,
    pub database_path: String,
    pub max_body_bytes: u64,
    pub request_timeout_seconds: u64,
    pub default_page_size: u32,
    pub max_page_size: u32,
    pub default_trace_depth: u32,
    pub max_trace_depth: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8000".to_string(),
            api_token: None,
            database_path: "./tracelet.db".to_string(),
            max_body_bytes: 1024 * 1024,
            request_timeout_seconds: 15,
            default_page_size: 100,
            max_page_size: 500,
            default_trace_depth: DEFAULT_TRACE_DEPTH,
            max_trace_depth: MAX_TRACE_DEPTH,
        }
    }
}

impl AppConfig {
    pub async fn load() -> Result<Self> {
        let path = env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| "./config.toml".to_string());
        Self::load_from_path(&path).await
    }

    pub async fn load_from_path(path: &str) -> Result<Self> {
        let file_path = Path::new(path);
        let base_dir = file_path.parent();
        let mut config = if file_path.exists() {
            let content = fs::read_to_string(file_path).await?;
            toml::from_str::<AppConfig>(&content)
                .map_err(|err| anyhow!("invalid config {}: {}", file_path.display(), err))?
        } else {
            warn!(path = %file_path.display(), "config file not found, using defaults");
            AppConfig::default()
        };
        config.apply_env_overrides();
        config.resolve_paths(base_dir);
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    pub fn normalize(&mut self) {
        if let Some(api_token) = &self.api_token {
            let trimmed = api_token.trim();
            self.api_token = if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            };
        }
        self.database_path = self.database_path.trim().to_string();
    }

    fn resolve_paths(&mut self, base_dir: Option<&Path>) {
        let Some(base) = base_dir else {
            return;
        };
        if self.database_path.trim() == IN_MEMORY_DATABASE {
            return;
        }
        self.database_path = resolve_path(base, &self.database_path);
    }

    pub fn validate(&self) -> Result<()> {
        self.bind_addr
            .parse::<std::net::SocketAddr>()
            .map_err(|err| anyhow!("invalid bind_addr: {}", err))?;
        if self.database_path.is_empty() {
            return Err(anyhow!("database_path must not be empty"));
        }
        if self.max_body_bytes == 0 {
            return Err(anyhow!("max_body_bytes must be greater than 0"));
        }
        if self.request_timeout_seconds == 0 {
            return Err(anyhow!("request_timeout_seconds must be greater than 0"));
        }
        if self.default_page_size == 0 || self.default_page_size > self.max_page_size {
            return Err(anyhow!(
                "default_page_size must be within 1..={}",
                self.max_page_size
            ));
        }
        if self.default_trace_depth == 0 || self.default_trace_depth > self.max_trace_depth {
            return Err(anyhow!(
                "default_trace_depth must be within 1..={}",
                self.max_trace_depth
            ));
        }
        Ok(())
    }

    pub fn is_in_memory(&self) -> bool {
        self.database_path == IN_MEMORY_DATABASE
    }

    pub fn to_runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            bind_addr: self.bind_addr.clone(),
            api_token: self.api_token.clone(),
            max_body_bytes: self.max_body_bytes,
            request_timeout_seconds: self.request_timeout_seconds,
            default_page_size: self.default_page_size,
            max_page_size: self.max_page_size,
            default_trace_depth: self.default_trace_depth,
            max_trace_depth: self.max_trace_depth,
        }
    }

    pub fn to_db_config(&self) -> DbConfig {
        DbConfig {
            database_path: self.database_path.clone(),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(value) = env::var("TRACELET_BIND_ADDR") {
            self.bind_addr = value;
        }
        if let Ok(value) = env::var("TRACELET_API_TOKEN") {
            self.api_token = Some(value);
        }
        if let Ok(value) = env::var("TRACELET_DATABASE_PATH") {
            self.database_path = value;
        }
        if let Ok(value) = env::var("TRACELET_MAX_BODY_BYTES") {
            self.max_body_bytes = value.parse().unwrap_or(self.max_body_bytes);
        }
        if let Ok(value) = env::var("TRACELET_REQUEST_TIMEOUT_SECONDS") {
            self.request_timeout_seconds = value.parse().unwrap_or(self.request_timeout_seconds);
        }
        if let Ok(value) = env::var("TRACELET_DEFAULT_PAGE_SIZE") {
            self.default_page_size = value.parse().unwrap_or(self.default_page_size);
        }
        if let Ok(value) = env::var("TRACELET_MAX_PAGE_SIZE") {
            self.max_page_size = value.parse().unwrap_or(self.max_page_size);
        }
        if let Ok(value) = env::var("TRACELET_DEFAULT_TRACE_DEPTH") {
            self.default_trace_depth = value.parse().unwrap_or(self.default_trace_depth);
        }
        if let Ok(value) = env::var("TRACELET_MAX_TRACE_DEPTH") {
            self.max_trace_depth = value.parse().unwrap_or(self.max_trace_depth);
        }
    }
}

fn resolve_path(base: &Path, value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return trimmed.to_string();
    }
    let path = Path::new(trimmed);
    if path.is_absolute() {
        trimmed.to_string()
    } else {
        base.join(path).to_string_lossy().to_string()
    }
}
