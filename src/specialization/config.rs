//! Configuration for the Persistence Gateway's HTTP backend.
//!
//! Grounded on `interfaces::adapters::rest_api::RestApiAdapter`'s
//! base-url/auth/timeout fields, flattened into a plain struct since this
//! subsystem's gateway is a typed trait rather than a generic adapter
//! taking a `HashMap<String, serde_json::Value>` config blob.

use std::time::Duration;

/// Connection settings for `HttpPersistenceGateway`. Collection names are
/// not configurable here — they're fixed document ids the wire contract
/// requires both sides to agree on, and live as constants on the gateway
/// itself rather than as config an embedder could point elsewhere.
#[derive(Debug, Clone)]
pub struct SpecializationConfig {
    pub base_url: String,
    pub bearer_token: String,
    pub request_timeout: Duration,
}

impl SpecializationConfig {
    pub fn new(base_url: impl Into<String>, bearer_token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            bearer_token: bearer_token.into(),
            ..Default::default()
        }
    }
}

impl Default for SpecializationConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            bearer_token: String::new(),
            request_timeout: Duration::from_secs(30),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_request_timeout() {
        let config = SpecializationConfig::default();
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_new_sets_base_url_and_token() {
        let config = SpecializationConfig::new("https://store.internal", "tok-123");
        assert_eq!(config.base_url, "https://store.internal");
        assert_eq!(config.bearer_token, "tok-123");
    }
}
