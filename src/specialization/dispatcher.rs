//! Dispatcher (Matcher) — ranks eligible agents for a role and returns
//! the best candidate.
//!
//! Never raises: every failure mode (no candidates, unresolvable role,
//! unresolvable agent) collapses to a `None` return. Grounded on
//! `SkillDescriptor::match_score`'s weighted-component scoring and on
//! `A2ARegistry::by_capability`'s filter-then-rank shape.

use super::agent_host::AgentHost;
use super::role::RoleRegistry;
use super::store::{AgentSpecialization, SpecializationStore};

const SUCCESS_WEIGHT: f64 = 0.4;
const EXPERIENCE_WEIGHT: f64 = 0.2;
const QUALITY_WEIGHT: f64 = 0.4;
const EXPERIENCE_SATURATION_TASKS: f64 = 20.0;
const DOMAIN_BONUS_MAX: f64 = 20.0;
const MISSION_BONUS: f64 = 30.0;
const NO_METRICS_PROFICIENCY: f64 = 50.0;

fn clamp_0_100(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}

struct ScoredCandidate {
    agent_id: String,
    score: f64,
    order: usize,
}

/// Rank eligible agents and return the id of the best candidate, or
/// `None` if none qualify.
pub fn find_best_agent_for_task(
    store: &SpecializationStore,
    roles: &RoleRegistry,
    host: &dyn AgentHost,
    role_id: &str,
    task_verb: Option<&str>,
    domain_ids: &[String],
    mission_id: Option<&str>,
) -> Option<String> {
    let candidates: Vec<AgentSpecialization> = store
        .list_by_role(role_id)
        .into_iter()
        .filter(|spec| {
            host.agent_exists(&spec.agent_id)
                && host
                    .agent_facts(&spec.agent_id)
                    .map(|facts| !facts.status.is_terminal())
                    .unwrap_or(false)
        })
        .collect();

    let mission_filtered: Vec<AgentSpecialization> = match mission_id {
        Some(mission) => {
            let filtered: Vec<AgentSpecialization> = candidates
                .iter()
                .filter(|spec| {
                    host.agent_facts(&spec.agent_id)
                        .and_then(|facts| facts.mission_id)
                        .as_deref()
                        == Some(mission)
                })
                .cloned()
                .collect();
            if filtered.is_empty() {
                candidates
            } else {
                filtered
            }
        }
        None => candidates,
    };

    let mut scored: Vec<ScoredCandidate> = Vec::new();
    for (order, spec) in mission_filtered.into_iter().enumerate() {
        let Some(role) = roles.get_role(&spec.role_id) else {
            continue;
        };

        let proficiency = match task_verb.and_then(|verb| spec.performance_by_task.get(verb)) {
            None => NO_METRICS_PROFICIENCY,
            Some(metrics) => {
                let success_factor = metrics.success_rate / 100.0;
                let experience_factor = (metrics.task_count as f64 / EXPERIENCE_SATURATION_TASKS).min(1.0);
                let quality_factor = metrics.quality_score / 100.0;
                clamp_0_100(
                    (SUCCESS_WEIGHT * success_factor
                        + EXPERIENCE_WEIGHT * experience_factor
                        + QUALITY_WEIGHT * quality_factor)
                        * 100.0,
                )
            }
        };

        let mut score = proficiency;

        if !domain_ids.is_empty() {
            let matches = domain_ids
                .iter()
                .filter(|d| role.knowledge_domains.contains(d))
                .count();
            score += (matches as f64 / domain_ids.len() as f64) * DOMAIN_BONUS_MAX;
        }

        if mission_id.is_some() {
            let agent_mission = host.agent_facts(&spec.agent_id).and_then(|f| f.mission_id);
            if agent_mission.as_deref() == mission_id {
                score += MISSION_BONUS;
            }
        }

        scored.push(ScoredCandidate {
            agent_id: spec.agent_id.clone(),
            score,
            order,
        });
    }

    scored.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.order.cmp(&b.order))
    });

    scored.into_iter().next().map(|c| c.agent_id)
}
