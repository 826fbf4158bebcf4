//! Persistence Gateway — the contract to a remote document store.
//!
//! Wraps the collection-as-envelope protocol described here: each
//! collection is a single document keyed by its own name, holding a
//! `data` array. Reads and writes never raise to the caller — failures
//! are logged and the caller proceeds with in-memory state.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use std::time::Duration;

use super::config::SpecializationConfig;
use super::error::GatewayError;

/// Fixed document id for the specialization collection.
pub const AGENT_SPECIALIZATIONS_COLLECTION: &str = "agent_specializations";
/// Fixed document id for the knowledge-domain collection.
pub const KNOWLEDGE_DOMAINS_COLLECTION: &str = "knowledge_domains";

/// Contract with the external document store.
///
/// Implementations must tolerate the query response's `data[0]` being
/// either the records array directly or `{data: <array>}` — both shapes
/// appear in the persisted corpus.
#[async_trait]
pub trait PersistenceGateway: Send + Sync {
    /// Load the named collection's records. Returns an empty list on any
    /// failure (no response, empty response, malformed document) — this
    /// never raises.
    async fn load_collection(&self, name: &str) -> Vec<Value>;

    /// Replace the named collection's entire contents with `records`.
    /// Returns `Err` only so the caller can log; callers must treat this
    /// as non-fatal and keep the in-memory state as canonical.
    async fn store_collection(&self, name: &str, records: Vec<Value>) -> Result<(), GatewayError>;
}

/// HTTP implementation of the Persistence Gateway, matching the
/// `POST /queryData` / `POST /storeData` wire contract.
pub struct HttpPersistenceGateway {
    base_url: String,
    token: String,
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpPersistenceGateway {
    /// Create a gateway pointed at `base_url`, authenticating every call
    /// with a bearer `token`.
    pub fn new(base_url: impl Into<String>, token: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into(),
            token: token.into(),
            client: reqwest::Client::new(),
            timeout,
        }
    }

    /// Build a gateway from a `SpecializationConfig`, the way the teacher's
    /// adapters are constructed from their config struct at boot.
    pub fn from_config(config: &SpecializationConfig) -> Self {
        Self::new(&config.base_url, &config.bearer_token, config.request_timeout)
    }
}

#[async_trait]
impl PersistenceGateway for HttpPersistenceGateway {
    async fn load_collection(&self, name: &str) -> Vec<Value> {
        let url = format!("{}/queryData", self.base_url);
        let body = serde_json::json!({
            "collection": name,
            "query": { "_id": name },
            "limit": 1,
        });

        let response = match self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&body)
            .timeout(self.timeout)
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) => {
                log::warn!("PersistenceGateway: load_collection('{name}') failed: {e}");
                return Vec::new();
            }
        };

        let parsed: Value = match response.json().await {
            Ok(v) => v,
            Err(e) => {
                log::warn!(
                    "PersistenceGateway: load_collection('{name}') returned malformed body: {e}"
                );
                return Vec::new();
            }
        };

        extract_records(&parsed)
    }

    async fn store_collection(&self, name: &str, records: Vec<Value>) -> Result<(), GatewayError> {
        let url = format!("{}/storeData", self.base_url);
        let body = serde_json::json!({
            "id": name,
            "data": records,
            "storageType": "mongo",
            "collection": name,
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&body)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| GatewayError::Unavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(GatewayError::Unavailable(format!(
                "store_collection('{name}') returned status {}",
                response.status()
            )));
        }

        Ok(())
    }
}

/// Extract the records array from a `queryData` response, tolerating both
/// documented shapes: `response.data[0]` being the array directly, or
/// `response.data[0].data` being the array.
fn extract_records(parsed: &Value) -> Vec<Value> {
    let first = parsed.get("data").and_then(|d| d.as_array()).and_then(|a| a.first());
    let Some(first) = first else {
        return Vec::new();
    };

    if let Some(arr) = first.as_array() {
        return arr.clone();
    }
    if let Some(arr) = first.get("data").and_then(|d| d.as_array()) {
        return arr.clone();
    }
    Vec::new()
}

/// In-memory gateway used by tests and by embedders that don't need a
/// remote store. Never fails.
pub struct InMemoryGateway {
    collections: Mutex<std::collections::HashMap<String, Vec<Value>>>,
}

impl InMemoryGateway {
    pub fn new() -> Self {
        Self {
            collections: Mutex::new(std::collections::HashMap::new()),
        }
    }
}

impl Default for InMemoryGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PersistenceGateway for InMemoryGateway {
    async fn load_collection(&self, name: &str) -> Vec<Value> {
        self.collections
            .lock()
            .get(name)
            .cloned()
            .unwrap_or_default()
    }

    async fn store_collection(&self, name: &str, records: Vec<Value>) -> Result<(), GatewayError> {
        self.collections.lock().insert(name.to_string(), records);
        Ok(())
    }
}
