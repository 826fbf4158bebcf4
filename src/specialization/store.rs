//! Specialization Store — per-agent role assignment and performance
//! history.
//!
//! Holds one `AgentSpecialization` per assigned agent, indexed by agent
//! id. Every mutation (`put`, `delete`) flushes the full collection to
//! the persistence gateway; the snapshot is copied out while the lock is
//! held, then the write lock is released before the network call, so a
//! slow or unreachable store never blocks readers or other writers.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use super::error::SpecializationError;
use super::gateway::{PersistenceGateway, AGENT_SPECIALIZATIONS_COLLECTION};

/// Rolling performance figures for one (agent, role) assignment.
///
/// Updated in place by the Performance Accountant; this struct itself
/// carries no update logic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskPerformanceMetrics {
    pub success_rate: f64,
    pub task_count: u64,
    pub average_task_duration: f64,
    pub last_evaluation: Option<DateTime<Utc>>,
    pub quality_score: f64,
}

impl Default for TaskPerformanceMetrics {
    /// The baseline used when a task-completion event is the first
    /// observation for a (agent, task-verb) pair. Critic
    /// feedback arriving first uses a different baseline — see
    /// `accountant::record_critic_feedback`.
    fn default() -> Self {
        Self {
            success_rate: 0.0,
            task_count: 0,
            average_task_duration: 0.0,
            last_evaluation: None,
            quality_score: 50.0,
        }
    }
}

/// Per-field overrides an assignment can layer on top of a role's
/// defaults. Any field left `None` falls back to the role's value when
/// resolving the "effective" view (used by the Dispatcher and the
/// Prompt Synthesizer).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpecializationCustomizations {
    #[serde(default)]
    pub capabilities: Option<Vec<String>>,
    #[serde(default)]
    pub responsibilities: Option<Vec<String>>,
    #[serde(default)]
    pub knowledge_domains: Option<Vec<String>>,
    #[serde(default)]
    pub system_prompt: Option<String>,
}

/// A single agent's specialization record: which role it was assigned,
/// when, any per-agent overrides, and the performance history keyed by
/// task verb/type (free-form; the dispatcher and accountant treat the
/// key as opaque).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSpecialization {
    pub agent_id: String,
    pub role_id: String,
    pub assigned_at: DateTime<Utc>,
    #[serde(default)]
    pub performance_by_task: HashMap<String, TaskPerformanceMetrics>,
    #[serde(default)]
    pub customizations: SpecializationCustomizations,
}

impl AgentSpecialization {
    pub fn new(agent_id: impl Into<String>, role_id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            agent_id: agent_id.into(),
            role_id: role_id.into(),
            assigned_at: now,
            performance_by_task: HashMap::new(),
            customizations: SpecializationCustomizations::default(),
        }
    }

    /// Validating constructor used at the one boundary where ids arrive
    /// from an external caller (the Assignment Controller): rejects an
    /// empty `agent_id` or `role_id` rather than persisting a record that
    /// can never resolve.
    pub fn try_new(
        agent_id: impl Into<String>,
        role_id: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<Self, SpecializationError> {
        let agent_id = agent_id.into();
        let role_id = role_id.into();
        if agent_id.is_empty() {
            return Err(SpecializationError::ValidationError(
                "agent_id must not be empty".to_string(),
            ));
        }
        if role_id.is_empty() {
            return Err(SpecializationError::ValidationError(
                "role_id must not be empty".to_string(),
            ));
        }
        Ok(Self::new(agent_id, role_id, now))
    }
}

/// Tolerant deserialization wrapper for persisted specialization
/// documents. Older records carry a top-level `proficiency` field in
/// place of `performance_by_task`; that field is accepted and discarded,
/// yielding an empty performance map rather than a deserialization
/// failure.
fn specialization_from_value(value: serde_json::Value) -> Result<AgentSpecialization, serde_json::Error> {
    match serde_json::from_value::<AgentSpecialization>(value.clone()) {
        Ok(spec) => Ok(spec),
        Err(_) => {
            let mut obj = value;
            if let Some(map) = obj.as_object_mut() {
                map.remove("proficiency");
                map.entry("performance_by_task")
                    .or_insert_with(|| serde_json::json!({}));
                map.entry("customizations")
                    .or_insert_with(|| serde_json::json!({}));
            }
            serde_json::from_value::<AgentSpecialization>(obj)
        }
    }
}

fn ordered_snapshot(
    order: &[String],
    records: &HashMap<String, AgentSpecialization>,
) -> Vec<AgentSpecialization> {
    order.iter().filter_map(|id| records.get(id)).cloned().collect()
}

/// Store of agent specializations, indexed by agent id.
///
/// `order` tracks insertion order separately from the `HashMap`, which
/// makes no ordering guarantee of its own: the Dispatcher's tie-break rule
/// depends on stable insertion order, so every read that feeds the
/// dispatcher walks `order` rather than the map.
pub struct SpecializationStore {
    records: RwLock<HashMap<String, AgentSpecialization>>,
    order: RwLock<Vec<String>>,
    gateway: std::sync::Arc<dyn PersistenceGateway>,
    /// Serializes concurrent flushes to the gateway so two overlapping
    /// writers can't race and let an older snapshot land after a newer one.
    flush_lock: tokio::sync::Mutex<()>,
}

impl SpecializationStore {
    pub fn new(gateway: std::sync::Arc<dyn PersistenceGateway>) -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            order: RwLock::new(Vec::new()),
            gateway,
            flush_lock: tokio::sync::Mutex::new(()),
        }
    }

    /// Load specializations from the persistence gateway, replacing the
    /// current in-memory set. Called once at boot. Insertion order
    /// follows the order records appear in the loaded collection.
    pub async fn hydrate(&self) {
        let loaded = self.gateway.load_collection(AGENT_SPECIALIZATIONS_COLLECTION).await;
        let mut records = self.records.write();
        let mut order = self.order.write();
        records.clear();
        order.clear();
        for value in loaded {
            match specialization_from_value(value) {
                Ok(spec) => {
                    order.push(spec.agent_id.clone());
                    records.insert(spec.agent_id.clone(), spec);
                }
                Err(e) => log::warn!("SpecializationStore: skipping malformed record: {e}"),
            }
        }
    }

    pub fn get(&self, agent_id: &str) -> Option<AgentSpecialization> {
        self.records.read().get(agent_id).cloned()
    }

    /// Specializations with the given role, in stable insertion order.
    pub fn list_by_role(&self, role_id: &str) -> Vec<AgentSpecialization> {
        let records = self.records.read();
        self.order
            .read()
            .iter()
            .filter_map(|id| records.get(id))
            .filter(|s| s.role_id == role_id)
            .cloned()
            .collect()
    }

    /// All specializations, in stable insertion order.
    pub fn list_all(&self) -> Vec<AgentSpecialization> {
        let records = self.records.read();
        self.order
            .read()
            .iter()
            .filter_map(|id| records.get(id))
            .cloned()
            .collect()
    }

    /// Insert or replace the record for `spec.agent_id`, then flush the
    /// full collection to the gateway. A replacing `put` keeps the
    /// agent's original insertion position; a brand-new agent is
    /// appended.
    pub async fn put(&self, spec: AgentSpecialization) {
        let snapshot = {
            let mut records = self.records.write();
            let mut order = self.order.write();
            if !records.contains_key(&spec.agent_id) {
                order.push(spec.agent_id.clone());
            }
            records.insert(spec.agent_id.clone(), spec);
            ordered_snapshot(&order, &records)
        };
        self.flush(snapshot).await;
    }

    /// Remove the record for `agent_id`, if any, then flush the full
    /// collection to the gateway.
    pub async fn delete(&self, agent_id: &str) {
        let snapshot = {
            let mut records = self.records.write();
            let mut order = self.order.write();
            records.remove(agent_id);
            order.retain(|id| id != agent_id);
            ordered_snapshot(&order, &records)
        };
        self.flush(snapshot).await;
    }

    /// Run `mutate` against the record for `agent_id` under the store's
    /// exclusive lock, returning the updated record (or `None` if no
    /// record exists), then flush the full collection. Used by the
    /// Performance Accountant so read-modify-write happens atomically
    /// with respect to other mutators.
    pub async fn update<F>(&self, agent_id: &str, mutate: F) -> Option<AgentSpecialization>
    where
        F: FnOnce(&mut AgentSpecialization),
    {
        let (updated, snapshot) = {
            let mut records = self.records.write();
            let order = self.order.read();
            let Some(spec) = records.get_mut(agent_id) else {
                return None;
            };
            mutate(spec);
            let updated = spec.clone();
            (updated, ordered_snapshot(&order, &records))
        };
        self.flush(snapshot).await;
        Some(updated)
    }

    async fn flush(&self, snapshot: Vec<AgentSpecialization>) {
        let records: Vec<serde_json::Value> = snapshot
            .iter()
            .filter_map(|s| serde_json::to_value(s).ok())
            .collect();

        let _guard = self.flush_lock.lock().await;
        if let Err(e) = self
            .gateway
            .store_collection(AGENT_SPECIALIZATIONS_COLLECTION, records)
            .await
        {
            log::warn!("SpecializationStore: failed to persist specializations: {e}");
        }
    }
}
