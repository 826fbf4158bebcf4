//! Role Registry — catalogue of role definitions agents can be specialized
//! into.
//!
//! Holds the predefined roles (registered at construction) plus any
//! dynamically registered ones, indexed by a derived id. Not persisted by
//! this subsystem: dynamic role registration lives for the process
//! lifetime only.

use std::collections::HashMap;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// A named bundle of capabilities, responsibilities, knowledge-domain
/// references, and a system-prompt template.
///
/// Immutable once registered; `register_role` with the same derived id
/// replaces the prior definition wholesale rather than mutating it in
/// place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    /// Stable token derived from `name` (lowercase, non-alphanumeric runs
    /// collapsed to a single underscore).
    pub id: String,
    pub name: String,
    pub description: String,
    /// Capability tokens. Unordered in meaning; stored as a
    /// duplicate-free `Vec` so prompt output and persistence stay stable.
    pub capabilities: Vec<String>,
    /// Ordered statements; order is preserved verbatim in synthesized
    /// prompts.
    pub responsibilities: Vec<String>,
    /// Knowledge domain ids this role draws on.
    pub knowledge_domains: Vec<String>,
    /// Free-form system prompt template.
    pub system_prompt: String,
    pub default_priority: i32,
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl Role {
    /// Construct a role with an id derived from `name`.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        capabilities: Vec<String>,
        responsibilities: Vec<String>,
        knowledge_domains: Vec<String>,
        system_prompt: impl Into<String>,
        default_priority: i32,
    ) -> Self {
        let name = name.into();
        Self {
            id: derive_id(&name),
            name,
            description: description.into(),
            capabilities: dedup(capabilities),
            responsibilities,
            knowledge_domains: dedup(knowledge_domains),
            system_prompt: system_prompt.into(),
            default_priority,
            metadata: HashMap::new(),
        }
    }
}

fn dedup(items: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    items.into_iter().filter(|i| seen.insert(i.clone())).collect()
}

/// Derive a stable id from a human-readable name: lowercase, with any run
/// of non-alphanumeric/underscore characters collapsed to a single `_`.
pub fn derive_id(name: &str) -> String {
    let lower = name.to_lowercase();
    let mut out = String::with_capacity(lower.len());
    let mut last_was_sep = false;
    for ch in lower.chars() {
        if ch.is_alphanumeric() || ch == '_' {
            out.push(ch);
            last_was_sep = false;
        } else if !last_was_sep {
            out.push('_');
            last_was_sep = true;
        }
    }
    out.trim_matches('_').to_string()
}

/// Registry of role definitions, indexed by derived id.
///
/// Reads take a shared lock; `register_role` takes an exclusive lock.
#[derive(Debug)]
pub struct RoleRegistry {
    roles: RwLock<HashMap<String, Role>>,
}

impl RoleRegistry {
    /// Create a registry pre-populated with the six predefined roles.
    pub fn new() -> Self {
        let registry = Self {
            roles: RwLock::new(HashMap::new()),
        };
        for role in predefined_roles() {
            registry.register_role(role);
        }
        registry
    }

    /// Register a role, deriving its id from `role.name` and overwriting
    /// any existing role with the same id.
    pub fn register_role(&self, role: Role) -> String {
        let id = derive_id(&role.name);
        let mut role = role;
        role.id = id.clone();
        log::info!("RoleRegistry: registered role '{}' ({})", role.name, id);
        self.roles.write().insert(id.clone(), role);
        id
    }

    /// Get a role by id.
    pub fn get_role(&self, id: &str) -> Option<Role> {
        self.roles.read().get(id).cloned()
    }

    /// List all registered roles, in arbitrary but stable-per-call order.
    pub fn list_roles(&self) -> Vec<Role> {
        self.roles.read().values().cloned().collect()
    }
}

impl Default for RoleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// The six predefined roles, with strings reproduced verbatim because
/// downstream prompt content depends on them.
pub fn predefined_roles() -> Vec<Role> {
    vec![
        Role::new(
            "coordinator",
            "Breaks down objectives and delegates to specialized agents.",
            vec![
                "delegation".to_string(),
                "planning".to_string(),
                "synthesis".to_string(),
            ],
            vec![
                "Break down complex objectives into actionable tasks.".to_string(),
                "Assign tasks to the most qualified agents.".to_string(),
                "Synthesize results from multiple agents into a coherent outcome.".to_string(),
            ],
            vec![],
            "You are a coordinator agent responsible for breaking down complex objectives, delegating tasks to specialized agents, and synthesizing their results into a coherent outcome.",
            90,
        ),
        Role::new(
            "researcher",
            "Gathers and verifies information from available sources.",
            vec![
                "web_search".to_string(),
                "document_analysis".to_string(),
                "fact_checking".to_string(),
            ],
            vec![
                "Gather relevant information from available sources.".to_string(),
                "Verify the accuracy of claims and data.".to_string(),
                "Summarize findings clearly and concisely.".to_string(),
            ],
            vec![],
            "You are a researcher agent responsible for gathering accurate, relevant information and presenting well-verified findings.",
            70,
        ),
        Role::new(
            "creative",
            "Generates original ideas and content.",
            vec![
                "content_generation".to_string(),
                "ideation".to_string(),
                "narrative_design".to_string(),
            ],
            vec![
                "Generate original ideas and content.".to_string(),
                "Explore multiple creative directions before committing.".to_string(),
                "Refine output based on feedback.".to_string(),
            ],
            vec![],
            "You are a creative agent responsible for generating original, engaging content and exploring imaginative solutions.",
            60,
        ),
        Role::new(
            "critic",
            "Evaluates quality and provides actionable feedback.",
            vec![
                "quality_assessment".to_string(),
                "feedback_synthesis".to_string(),
                "risk_identification".to_string(),
            ],
            vec![
                "Evaluate the quality and correctness of produced work.".to_string(),
                "Identify risks, gaps, and inconsistencies.".to_string(),
                "Provide actionable, specific feedback.".to_string(),
            ],
            vec![],
            "You are a critic agent responsible for rigorously evaluating work product and providing specific, actionable feedback.",
            75,
        ),
        Role::new(
            "executor",
            "Carries out assigned tasks reliably using available tools.",
            vec![
                "task_execution".to_string(),
                "tool_use".to_string(),
                "status_reporting".to_string(),
            ],
            vec![
                "Execute assigned tasks reliably.".to_string(),
                "Use available tools correctly and safely.".to_string(),
                "Report progress and results accurately.".to_string(),
            ],
            vec![],
            "You are an executor agent responsible for carrying out assigned tasks reliably using the tools available to you.",
            65,
        ),
        Role::new(
            "domain_expert",
            "Applies deep, specialized knowledge to assigned problems.",
            vec![
                "deep_analysis".to_string(),
                "domain_consultation".to_string(),
                "specialized_reasoning".to_string(),
            ],
            vec![
                "Apply deep domain expertise to assigned problems.".to_string(),
                "Advise other agents on domain-specific considerations.".to_string(),
                "Flag domain-specific risks others may miss.".to_string(),
            ],
            vec![],
            "You are a domain expert agent responsible for applying deep, specialized knowledge to the problems you are given.",
            80,
        ),
    ]
}
