//! Agent specialization & dispatch subsystem.
//!
//! Bundles role definitions, knowledge domains, per-agent performance
//! history, and the dispatch/prompt-synthesis logic that sits between a
//! coordinator and the agents it delegates to. See `SpecializationSubsystem`
//! for the facade an embedder (an `axum` router, a CLI, a test) wires up
//! against.

pub mod accountant;
pub mod agent_host;
pub mod assignment;
pub mod config;
pub mod dispatcher;
pub mod domain;
pub mod error;
pub mod gateway;
pub mod prompt;
pub mod role;
pub mod store;

use std::sync::Arc;

pub use agent_host::{AgentFacts, AgentHost, AgentStatus};
pub use config::SpecializationConfig;
pub use domain::{DomainRegistry, KnowledgeDomain};
pub use error::{GatewayError, SpecializationError};
pub use gateway::{HttpPersistenceGateway, InMemoryGateway, PersistenceGateway};
pub use role::{Role, RoleRegistry};
pub use store::{AgentSpecialization, SpecializationCustomizations, SpecializationStore, TaskPerformanceMetrics};

/// Facade bundling the Role Registry, Knowledge-Domain Registry,
/// Specialization Store, and the Dispatcher/Prompt Synthesizer/Assignment
/// Controller logic behind the eight operations an embedder needs.
pub struct SpecializationSubsystem {
    pub roles: RoleRegistry,
    pub domains: DomainRegistry,
    pub store: SpecializationStore,
    host: Arc<dyn AgentHost>,
}

impl SpecializationSubsystem {
    /// Construct a subsystem against a shared persistence gateway and an
    /// agent host. Does not hydrate automatically — call `hydrate` once
    /// at boot.
    pub fn new(gateway: Arc<dyn PersistenceGateway>, host: Arc<dyn AgentHost>) -> Self {
        Self {
            roles: RoleRegistry::new(),
            domains: DomainRegistry::new(gateway.clone()),
            store: SpecializationStore::new(gateway),
            host,
        }
    }

    /// Load domains and specializations from the persistence gateway.
    pub async fn hydrate(&self) {
        self.domains.hydrate().await;
        self.store.hydrate().await;
    }

    pub fn register_role(&self, role: Role) -> String {
        self.roles.register_role(role)
    }

    pub fn get_role(&self, role_id: &str) -> Option<Role> {
        self.roles.get_role(role_id)
    }

    pub async fn create_domain(&self, domain: KnowledgeDomain) -> KnowledgeDomain {
        self.domains.create_domain(domain).await
    }

    pub fn get_domain(&self, domain_id: &str) -> Option<KnowledgeDomain> {
        self.domains.get_domain(domain_id)
    }

    pub fn get_specialization(&self, agent_id: &str) -> Option<AgentSpecialization> {
        self.store.get(agent_id)
    }

    pub fn list_agents_with_role(&self, role_id: &str) -> Vec<AgentSpecialization> {
        self.store.list_by_role(role_id)
    }

    /// Attach `role_id` to `agent_id`, applying role side-effects to the
    /// agent host and committing the new specialization.
    pub async fn assign(
        &self,
        agent_id: &str,
        role_id: &str,
        customizations: SpecializationCustomizations,
    ) -> Result<AgentSpecialization, SpecializationError> {
        assignment::assign(
            &self.store,
            &self.roles,
            self.host.as_ref(),
            agent_id,
            role_id,
            customizations,
        )
        .await
    }

    /// Rank eligible agents for `role_id` and return the best candidate,
    /// or `None`. Never raises.
    pub fn find_best_agent_for_task(
        &self,
        role_id: &str,
        task_verb: Option<&str>,
        domain_ids: &[String],
        mission_id: Option<&str>,
    ) -> Option<String> {
        dispatcher::find_best_agent_for_task(
            &self.store,
            &self.roles,
            self.host.as_ref(),
            role_id,
            task_verb,
            domain_ids,
            mission_id,
        )
    }

    /// Record the outcome of one completed task.
    pub async fn record_task_completion(
        &self,
        agent_id: &str,
        task_verb: &str,
        success: bool,
        duration_seconds: f64,
    ) {
        accountant::record_task_completion(&self.store, agent_id, task_verb, success, duration_seconds).await;
    }

    /// Record a critic-assigned quality score.
    pub async fn record_feedback(&self, agent_id: &str, task_verb: &str, quality_score: f64) {
        accountant::record_critic_feedback(&self.store, agent_id, task_verb, quality_score).await;
    }

    /// Synthesize a prompt for `agent_id` given `task_description`.
    pub fn synthesize_prompt(&self, agent_id: &str, task_description: &str) -> String {
        let specialization = self.store.get(agent_id);
        prompt::synthesize_prompt(&self.roles, specialization.as_ref(), task_description, |domain_id| {
            self.domains
                .get_domain(domain_id)
                .map(|d| (d.name, d.description))
        })
    }
}
