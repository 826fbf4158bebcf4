//! Assignment Controller — the top-level "attach a role to an agent"
//! operation.
//!
//! Grounded on the validate-then-mutate shape of `crew::Crew::get_agent`'s
//! registration flow and on the side-effect-through-a-trait pattern
//! `contract::subsystem::Subsystem` uses to let the core call into the
//! embedder without introspecting it.

use chrono::Utc;

use super::agent_host::AgentHost;
use super::error::SpecializationError;
use super::role::RoleRegistry;
use super::store::{AgentSpecialization, SpecializationCustomizations, SpecializationStore};

/// Validate role and agent existence, build a new specialization record,
/// apply role side-effects to the agent, and commit it to the store.
///
/// If the agent host rejects any side-effect, the error is propagated as
/// `RoleApplicationFailed` and the store is left untouched — there is no
/// partial commit.
pub async fn assign(
    store: &SpecializationStore,
    roles: &RoleRegistry,
    host: &dyn AgentHost,
    agent_id: &str,
    role_id: &str,
    customizations: SpecializationCustomizations,
) -> Result<AgentSpecialization, SpecializationError> {
    let role = roles
        .get_role(role_id)
        .ok_or_else(|| SpecializationError::RoleNotFound(role_id.to_string()))?;

    if !host.agent_exists(agent_id) {
        return Err(SpecializationError::AgentNotFound(agent_id.to_string()));
    }

    let mut spec = AgentSpecialization::try_new(agent_id, role_id, Utc::now())?;
    spec.customizations = customizations;

    let effective_prompt = spec
        .customizations
        .system_prompt
        .clone()
        .unwrap_or_else(|| role.system_prompt.clone());
    let effective_capabilities = spec
        .customizations
        .capabilities
        .clone()
        .unwrap_or_else(|| role.capabilities.clone());

    host.set_role(agent_id, role_id)
        .map_err(|e| SpecializationError::RoleApplicationFailed(e.to_string()))?;
    host.set_system_prompt(agent_id, &effective_prompt)
        .map_err(|e| SpecializationError::RoleApplicationFailed(e.to_string()))?;
    host.set_capabilities(agent_id, &effective_capabilities)
        .map_err(|e| SpecializationError::RoleApplicationFailed(e.to_string()))?;

    let context_view = serde_json::json!({
        "role_id": role_id,
        "system_prompt": effective_prompt,
        "capabilities": effective_capabilities,
    });
    host.store_in_context(agent_id, "role", context_view)
        .map_err(|e| SpecializationError::RoleApplicationFailed(e.to_string()))?;

    store.put(spec.clone()).await;

    Ok(spec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::specialization::agent_host::fixtures::FakeAgentHost;
    use crate::specialization::gateway::InMemoryGateway;

    fn setup() -> (SpecializationStore, RoleRegistry, FakeAgentHost) {
        let store = SpecializationStore::new(std::sync::Arc::new(InMemoryGateway::new()));
        let roles = RoleRegistry::new();
        let host = FakeAgentHost::new();
        (store, roles, host)
    }

    #[tokio::test]
    async fn test_assign_unknown_role_fails() {
        let (store, roles, host) = setup();
        host.add_agent("agent-1");
        let result = assign(
            &store,
            &roles,
            &host,
            "agent-1",
            "ghost_role",
            SpecializationCustomizations::default(),
        )
        .await;
        assert!(matches!(result, Err(SpecializationError::RoleNotFound(_))));
    }

    #[tokio::test]
    async fn test_assign_unknown_agent_fails() {
        let (store, roles, host) = setup();
        let result = assign(
            &store,
            &roles,
            &host,
            "ghost-agent",
            "researcher",
            SpecializationCustomizations::default(),
        )
        .await;
        assert!(matches!(result, Err(SpecializationError::AgentNotFound(_))));
    }

    #[tokio::test]
    async fn test_assign_applies_role_defaults_to_host() {
        let (store, roles, host) = setup();
        host.add_agent("agent-1");

        let spec = assign(
            &store,
            &roles,
            &host,
            "agent-1",
            "researcher",
            SpecializationCustomizations::default(),
        )
        .await
        .unwrap();

        assert_eq!(spec.role_id, "researcher");
        assert_eq!(host.role_of("agent-1").unwrap(), "researcher");
        assert!(host.prompt_of("agent-1").unwrap().contains("researcher agent"));
        assert!(host.capabilities_of("agent-1").contains(&"web_search".to_string()));
        assert!(host.context_of("agent-1", "role").is_some());
        assert!(store.get("agent-1").is_some());
    }

    #[tokio::test]
    async fn test_assign_applies_customization_overrides() {
        let (store, roles, host) = setup();
        host.add_agent("agent-1");

        let customizations = SpecializationCustomizations {
            system_prompt: Some("Custom prompt.".to_string()),
            capabilities: Some(vec!["custom_cap".to_string()]),
            ..Default::default()
        };

        assign(&store, &roles, &host, "agent-1", "researcher", customizations)
            .await
            .unwrap();

        assert_eq!(host.prompt_of("agent-1").unwrap(), "Custom prompt.");
        assert_eq!(host.capabilities_of("agent-1"), vec!["custom_cap".to_string()]);
    }

    #[tokio::test]
    async fn test_side_effect_failure_does_not_update_store() {
        let (store, roles, host) = setup();
        host.add_agent("agent-1");
        host.make_side_effects_fail();

        let result = assign(
            &store,
            &roles,
            &host,
            "agent-1",
            "researcher",
            SpecializationCustomizations::default(),
        )
        .await;

        assert!(matches!(
            result,
            Err(SpecializationError::RoleApplicationFailed(_))
        ));
        assert!(store.get("agent-1").is_none());
    }

    #[tokio::test]
    async fn test_reassignment_replaces_prior_record() {
        let (store, roles, host) = setup();
        host.add_agent("agent-1");

        assign(
            &store,
            &roles,
            &host,
            "agent-1",
            "researcher",
            SpecializationCustomizations::default(),
        )
        .await
        .unwrap();

        let second = assign(
            &store,
            &roles,
            &host,
            "agent-1",
            "critic",
            SpecializationCustomizations::default(),
        )
        .await
        .unwrap();

        assert_eq!(second.role_id, "critic");
        assert!(second.performance_by_task.is_empty());
        assert_eq!(store.get("agent-1").unwrap().role_id, "critic");
    }
}
