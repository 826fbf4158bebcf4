//! Knowledge-Domain Registry — catalogue of domains roles and agents can
//! reference.
//!
//! Domains are created dynamically (there is no predefined set, unlike
//! roles) and the full collection is persisted via the gateway on every
//! creation — failures are logged and swallowed so the in-memory
//! registry stays live even if the store is briefly unreachable.

use std::collections::HashMap;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use super::gateway::{PersistenceGateway, KNOWLEDGE_DOMAINS_COLLECTION};
use super::role::derive_id;

/// A resource a knowledge domain points to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    Document,
    Api,
    Database,
    Model,
    Tool,
}

/// A single resource pointer attached to a domain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainResource {
    #[serde(rename = "type")]
    pub resource_type: ResourceType,
    pub id: String,
    pub name: String,
    pub description: String,
    pub access_method: String,
}

/// A knowledge domain: a named area of expertise with optional
/// parent/subdomain back-references.
///
/// Parent/subdomain links are advisory only — the registry stores ids and
/// resolves them on demand, never owning references, so the core never
/// has to reason about graph acyclicity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeDomain {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub parent_domain: Option<String>,
    #[serde(default)]
    pub subdomains: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub resources: Vec<DomainResource>,
}

impl KnowledgeDomain {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: derive_id(&name),
            name,
            description: description.into(),
            parent_domain: None,
            subdomains: Vec::new(),
            keywords: Vec::new(),
            resources: Vec::new(),
        }
    }
}

/// Registry of knowledge domains, indexed by derived id.
pub struct DomainRegistry {
    domains: RwLock<HashMap<String, KnowledgeDomain>>,
    gateway: std::sync::Arc<dyn PersistenceGateway>,
    /// Serializes concurrent flushes to the gateway so two overlapping
    /// creations can't race and let an older snapshot land after a newer one.
    flush_lock: tokio::sync::Mutex<()>,
}

impl DomainRegistry {
    /// Create an empty registry backed by the given gateway. Does not
    /// hydrate automatically — call `hydrate` to load persisted domains.
    pub fn new(gateway: std::sync::Arc<dyn PersistenceGateway>) -> Self {
        Self {
            domains: RwLock::new(HashMap::new()),
            gateway,
            flush_lock: tokio::sync::Mutex::new(()),
        }
    }

    /// Load domains from the persistence gateway, replacing the current
    /// in-memory set. Called once at boot.
    pub async fn hydrate(&self) {
        let loaded = self.gateway.load_collection(KNOWLEDGE_DOMAINS_COLLECTION).await;
        let mut domains = self.domains.write();
        domains.clear();
        for value in loaded {
            match serde_json::from_value::<KnowledgeDomain>(value) {
                Ok(domain) => {
                    domains.insert(domain.id.clone(), domain);
                }
                Err(e) => log::warn!("DomainRegistry: skipping malformed domain record: {e}"),
            }
        }
    }

    /// Create a new domain, deriving its id from `domain.name`, and
    /// persist the full collection.
    pub async fn create_domain(&self, mut domain: KnowledgeDomain) -> KnowledgeDomain {
        domain.id = derive_id(&domain.name);
        let snapshot = {
            let mut domains = self.domains.write();
            domains.insert(domain.id.clone(), domain.clone());
            domains.values().cloned().collect::<Vec<_>>()
        };
        log::info!("DomainRegistry: created domain '{}'", domain.id);

        let records: Vec<serde_json::Value> = snapshot
            .iter()
            .filter_map(|d| serde_json::to_value(d).ok())
            .collect();

        let _guard = self.flush_lock.lock().await;
        if let Err(e) = self
            .gateway
            .store_collection(KNOWLEDGE_DOMAINS_COLLECTION, records)
            .await
        {
            log::warn!("DomainRegistry: failed to persist domains: {e}");
        }

        domain
    }

    pub fn get_domain(&self, id: &str) -> Option<KnowledgeDomain> {
        self.domains.read().get(id).cloned()
    }

    pub fn list_domains(&self) -> Vec<KnowledgeDomain> {
        self.domains.read().values().cloned().collect()
    }
}
