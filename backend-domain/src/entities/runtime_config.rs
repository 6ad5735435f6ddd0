// Runtime configuration handed to the application and HTTP layers

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub bind_addr: String,
    pub api_token: Option<String>,
    pub max_body_bytes: u64,
    pub request_timeout_seconds: u64,
    pub default_page_size: u32,
    pub max_page_size: u32,
    pub default_trace_depth: u32,
    pub max_trace_depth: u32,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8000".to_string(),
            api_token: None,
            max_body_bytes: 1024 * 1024,
            request_timeout_seconds: 15,
            default_page_size: 100,
            max_page_size: 500,
            default_trace_depth: crate::services::DEFAULT_TRACE_DEPTH,
            max_trace_depth: crate::services::MAX_TRACE_DEPTH,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DbConfig {
    pub database_path: String,
}
