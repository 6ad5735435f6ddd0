use axum::http::{header, HeaderMap};

use backend_domain::RuntimeConfig;

/// Checks the bearer token when one is configured; open otherwise.
pub fn authorize(config: &RuntimeConfig, headers: &HeaderMap) -> bool {
    if let Some(api_token) = &config.api_token {
        return extract_bearer(headers)
            .map(|v| v == *api_token)
            .unwrap_or(false);
    }
    true
}

fn extract_bearer(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?.trim();
    let token = value.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        return None;
    }
    Some(token.to_string())
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn config(token: Option<&str>) -> RuntimeConfig {
        RuntimeConfig {
            api_token: token.map(str::to_string),
            ..RuntimeConfig::default()
        }
    }

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn open_without_token() {
        assert!(authorize(&config(None), &HeaderMap::new()));
    }

    #[test]
    fn bearer_must_match() {
        let config = config(Some("s3cret"));
        assert!(authorize(&config, &headers("Bearer s3cret")));
        assert!(!authorize(&config, &headers("Bearer wrong")));
        assert!(!authorize(&config, &headers("Basic s3cret")));
        assert!(!authorize(&config, &headers("Bearer ")));
        assert!(!authorize(&config, &HeaderMap::new()));
    }
}
