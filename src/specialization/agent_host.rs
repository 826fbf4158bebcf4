//! Agent-side capability contract.
//!
//! The only contract this subsystem requires from the host process that
//! owns agent lifecycle. The core never introspects agents beyond this
//! trait — it does not own spawning, scheduling, or tool execution.

use serde_json::Value;

use super::error::SpecializationError;

/// Terminal and non-terminal states an agent can be in, as observed by
/// the dispatcher. Only the two terminal values matter to this
/// subsystem: a candidate in either is excluded from dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentStatus {
    Idle,
    Active,
    Waiting,
    Completed,
    Aborted,
}

impl AgentStatus {
    /// Whether this status excludes the agent from dispatch candidacy.
    pub fn is_terminal(self) -> bool {
        matches!(self, AgentStatus::Completed | AgentStatus::Aborted)
    }
}

/// Read-only facts about an agent the dispatcher needs that live outside
/// this subsystem's own store.
#[derive(Debug, Clone)]
pub struct AgentFacts {
    pub mission_id: Option<String>,
    pub status: AgentStatus,
}

/// Minimal capability set the Assignment Controller uses to apply role
/// side-effects to an agent, and that the Dispatcher uses to resolve
/// agent existence and state.
///
/// Implemented by the embedding host (the assistant process); this
/// subsystem only calls through the trait and never inspects a concrete
/// agent type.
pub trait AgentHost: Send + Sync {
    /// Whether `agent_id` is known to the host at all.
    fn agent_exists(&self, agent_id: &str) -> bool;

    /// Read-only facts needed for dispatch (mission id, status).
    fn agent_facts(&self, agent_id: &str) -> Option<AgentFacts>;

    /// Set the agent's role id.
    fn set_role(&self, agent_id: &str, role_id: &str) -> Result<(), SpecializationError>;

    /// Set the agent's effective system prompt.
    fn set_system_prompt(&self, agent_id: &str, prompt: &str) -> Result<(), SpecializationError>;

    /// Set the agent's effective capability set.
    fn set_capabilities(&self, agent_id: &str, capabilities: &[String]) -> Result<(), SpecializationError>;

    /// Publish an arbitrary context record under `key` (used to publish
    /// the merged "role" view after assignment).
    fn store_in_context(&self, agent_id: &str, key: &str, value: Value) -> Result<(), SpecializationError>;
}

#[cfg(test)]
pub mod fixtures {
    //! Test double for `AgentHost`, used across the subsystem's test
    //! suites.
    use super::*;
    use parking_lot::RwLock;
    use std::collections::HashMap;

    #[derive(Default)]
    struct RecordedAgent {
        facts: AgentFacts,
        role_id: Option<String>,
        system_prompt: Option<String>,
        capabilities: Vec<String>,
        context: HashMap<String, Value>,
    }

    impl Default for AgentFacts {
        fn default() -> Self {
            AgentFacts {
                mission_id: None,
                status: AgentStatus::Idle,
            }
        }
    }

    /// An in-memory `AgentHost` fixture that records every side-effect so
    /// tests can assert on it.
    #[derive(Default)]
    pub struct FakeAgentHost {
        agents: RwLock<HashMap<String, RecordedAgent>>,
        fail_side_effects: RwLock<bool>,
    }

    impl FakeAgentHost {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn add_agent(&self, agent_id: &str) {
            self.agents
                .write()
                .insert(agent_id.to_string(), RecordedAgent::default());
        }

        pub fn add_agent_with_mission(&self, agent_id: &str, mission_id: &str) {
            self.agents.write().insert(
                agent_id.to_string(),
                RecordedAgent {
                    facts: AgentFacts {
                        mission_id: Some(mission_id.to_string()),
                        status: AgentStatus::Idle,
                    },
                    ..Default::default()
                },
            );
        }

        pub fn set_status(&self, agent_id: &str, status: AgentStatus) {
            if let Some(a) = self.agents.write().get_mut(agent_id) {
                a.facts.status = status;
            }
        }

        pub fn make_side_effects_fail(&self) {
            *self.fail_side_effects.write() = true;
        }

        pub fn role_of(&self, agent_id: &str) -> Option<String> {
            self.agents.read().get(agent_id)?.role_id.clone()
        }

        pub fn prompt_of(&self, agent_id: &str) -> Option<String> {
            self.agents.read().get(agent_id)?.system_prompt.clone()
        }

        pub fn capabilities_of(&self, agent_id: &str) -> Vec<String> {
            self.agents
                .read()
                .get(agent_id)
                .map(|a| a.capabilities.clone())
                .unwrap_or_default()
        }

        pub fn context_of(&self, agent_id: &str, key: &str) -> Option<Value> {
            self.agents.read().get(agent_id)?.context.get(key).cloned()
        }
    }

    impl AgentHost for FakeAgentHost {
        fn agent_exists(&self, agent_id: &str) -> bool {
            self.agents.read().contains_key(agent_id)
        }

        fn agent_facts(&self, agent_id: &str) -> Option<AgentFacts> {
            self.agents.read().get(agent_id).map(|a| a.facts.clone())
        }

        fn set_role(&self, agent_id: &str, role_id: &str) -> Result<(), SpecializationError> {
            if *self.fail_side_effects.read() {
                return Err(SpecializationError::RoleApplicationFailed(
                    "fixture forced failure".to_string(),
                ));
            }
            if let Some(a) = self.agents.write().get_mut(agent_id) {
                a.role_id = Some(role_id.to_string());
            }
            Ok(())
        }

        fn set_system_prompt(&self, agent_id: &str, prompt: &str) -> Result<(), SpecializationError> {
            if *self.fail_side_effects.read() {
                return Err(SpecializationError::RoleApplicationFailed(
                    "fixture forced failure".to_string(),
                ));
            }
            if let Some(a) = self.agents.write().get_mut(agent_id) {
                a.system_prompt = Some(prompt.to_string());
            }
            Ok(())
        }

        fn set_capabilities(&self, agent_id: &str, capabilities: &[String]) -> Result<(), SpecializationError> {
            if *self.fail_side_effects.read() {
                return Err(SpecializationError::RoleApplicationFailed(
                    "fixture forced failure".to_string(),
                ));
            }
            if let Some(a) = self.agents.write().get_mut(agent_id) {
                a.capabilities = capabilities.to_vec();
            }
            Ok(())
        }

        fn store_in_context(&self, agent_id: &str, key: &str, value: Value) -> Result<(), SpecializationError> {
            if *self.fail_side_effects.read() {
                return Err(SpecializationError::RoleApplicationFailed(
                    "fixture forced failure".to_string(),
                ));
            }
            if let Some(a) = self.agents.write().get_mut(agent_id) {
                a.context.insert(key.to_string(), value);
            }
            Ok(())
        }
    }
}
