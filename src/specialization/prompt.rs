//! Prompt Synthesizer — assembles a role-specific system prompt for an
//! agent and a task description.
//!
//! Grounded on `agent::core::Agent::execute_without_timeout`'s
//! system-prompt assembly (plain string concatenation of role + goal +
//! conditional sections) and on the customization-over-role precedence
//! `Agent::interpolate_inputs` uses for input overrides.

use super::role::RoleRegistry;
use super::store::AgentSpecialization;

fn generic_prompt(task_description: &str) -> String {
    format!(
        "You are an AI agent tasked with: {task_description}. Complete this task to the best of your abilities."
    )
}

/// Build the prompt for `agent_id` given `task_description`.
///
/// Falls back to a generic prompt if the agent has no specialization, or
/// if its assigned role no longer resolves. `resolve_domain` looks up a
/// domain id's `(name, description)` in the Knowledge-Domain Registry;
/// domain ids that don't resolve are silently dropped from the "Relevant
/// Knowledge Domains" section rather than failing the whole prompt.
pub fn synthesize_prompt(
    roles: &RoleRegistry,
    specialization: Option<&AgentSpecialization>,
    task_description: &str,
    resolve_domain: impl Fn(&str) -> Option<(String, String)>,
) -> String {
    let Some(spec) = specialization else {
        return generic_prompt(task_description);
    };
    let Some(role) = roles.get_role(&spec.role_id) else {
        return generic_prompt(task_description);
    };

    let mut out = String::new();

    let system_prompt = spec
        .customizations
        .system_prompt
        .as_deref()
        .unwrap_or(&role.system_prompt);
    out.push_str(system_prompt);
    out.push_str("\n\n");

    out.push_str(&format!("Current Task: {task_description}"));
    out.push_str("\n\n");

    let effective_domains: &[String] = spec
        .customizations
        .knowledge_domains
        .as_deref()
        .unwrap_or(&role.knowledge_domains);
    let resolved_domains: Vec<(String, String)> = effective_domains
        .iter()
        .filter_map(|id| resolve_domain(id))
        .collect();
    if !resolved_domains.is_empty() {
        out.push_str("Relevant Knowledge Domains:\n");
        for (name, description) in &resolved_domains {
            out.push_str(&format!("- {name}: {description}\n"));
        }
        out.push('\n');
    }

    let effective_capabilities: &[String] = spec
        .customizations
        .capabilities
        .as_deref()
        .unwrap_or(&role.capabilities);
    if !effective_capabilities.is_empty() {
        out.push_str("Your Capabilities:\n");
        for capability in effective_capabilities {
            out.push_str(&format!("- {capability}\n"));
        }
        out.push('\n');
    }

    let effective_responsibilities: &[String] = spec
        .customizations
        .responsibilities
        .as_deref()
        .unwrap_or(&role.responsibilities);
    if !effective_responsibilities.is_empty() {
        out.push_str("Your Responsibilities:\n");
        for responsibility in effective_responsibilities {
            out.push_str(&format!("- {responsibility}\n"));
        }
        out.push('\n');
    }

    out.truncate(out.trim_end_matches('\n').len());
    out
}
