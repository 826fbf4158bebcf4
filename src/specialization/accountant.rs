//! Performance Accountant — updates an agent's rolling performance
//! figures after task completions and critic feedback.
//!
//! Both update paths run under the Specialization Store's exclusive lock
//! (via `SpecializationStore::update`) so a read-modify-write is never
//! interleaved with a concurrent update for the same agent, and both end
//! with a flush to the persistence gateway.
//!
//! Grounded in the exponentially-weighted update `SpawnedAgentState` uses
//! for its own `performance_score` on task completion, generalized here to
//! the separate success-rate/duration/quality-score figures this subsystem
//! tracks.

use chrono::Utc;

use super::store::{SpecializationStore, TaskPerformanceMetrics};

const TASK_COMPLETION_WEIGHT: f64 = 0.1;
const CRITIC_FEEDBACK_WEIGHT: f64 = 0.25;

fn clamp_0_100(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}

/// Records the outcome of one completed task for `agent_id` under
/// `task_type`, updating success rate, task count, and average duration
/// with an exponentially-weighted update. No-op (logged) if the agent has
/// no specialization record.
pub async fn record_task_completion(
    store: &SpecializationStore,
    agent_id: &str,
    task_type: &str,
    succeeded: bool,
    duration_seconds: f64,
) {
    let task_type = task_type.to_string();
    let result = store
        .update(agent_id, |spec| {
            let metrics = spec
                .performance_by_task
                .entry(task_type.clone())
                .or_insert_with(TaskPerformanceMetrics::default);

            let outcome = if succeeded { 100.0 } else { 0.0 };
            metrics.success_rate = clamp_0_100(
                metrics.success_rate * (1.0 - TASK_COMPLETION_WEIGHT) + outcome * TASK_COMPLETION_WEIGHT,
            );

            metrics.task_count += 1;
            metrics.average_task_duration = (metrics.average_task_duration
                * (metrics.task_count - 1) as f64
                + duration_seconds)
                / metrics.task_count as f64;

            metrics.last_evaluation = Some(Utc::now());
        })
        .await;

    if result.is_none() {
        log::warn!(
            "PerformanceAccountant: record_task_completion for unknown agent '{agent_id}'"
        );
    }
}

/// Records critic feedback (a 0-100 quality score) for `agent_id` under
/// `task_type`, folding it into the running quality score with an
/// exponentially-weighted update. No-op (logged) if the agent has no
/// specialization record.
pub async fn record_critic_feedback(
    store: &SpecializationStore,
    agent_id: &str,
    task_type: &str,
    quality_score: f64,
) {
    let task_type = task_type.to_string();
    let new_score = clamp_0_100(quality_score);
    let result = store
        .update(agent_id, |spec| {
            // Critic feedback arriving before any task completion seeds a
            // different baseline than the task-completion path's default
            // (spec-mandated; the two defaults are intentionally distinct).
            let metrics = spec
                .performance_by_task
                .entry(task_type.clone())
                .or_insert_with(|| TaskPerformanceMetrics {
                    success_rate: 75.0,
                    task_count: 1,
                    average_task_duration: 0.0,
                    last_evaluation: None,
                    quality_score: 50.0,
                });

            metrics.quality_score = clamp_0_100(
                metrics.quality_score * (1.0 - CRITIC_FEEDBACK_WEIGHT) + new_score * CRITIC_FEEDBACK_WEIGHT,
            );
            metrics.last_evaluation = Some(Utc::now());
        })
        .await;

    if result.is_none() {
        log::warn!(
            "PerformanceAccountant: record_critic_feedback for unknown agent '{agent_id}'"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::specialization::gateway::InMemoryGateway;
    use crate::specialization::store::AgentSpecialization;

    async fn seeded_store() -> SpecializationStore {
        let store = SpecializationStore::new(std::sync::Arc::new(InMemoryGateway::new()));
        store
            .put(AgentSpecialization::new("agent-1", "researcher", Utc::now()))
            .await;
        store
    }

    #[tokio::test]
    async fn test_record_task_completion_success() {
        let store = seeded_store().await;
        record_task_completion(&store, "agent-1", "research", true, 12.0).await;

        let spec = store.get("agent-1").unwrap();
        let metrics = spec.performance_by_task.get("research").unwrap();
        assert_eq!(metrics.task_count, 1);
        assert_eq!(metrics.average_task_duration, 12.0);
        assert!((metrics.success_rate - (0.0 * 0.9 + 100.0 * 0.1)).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_record_task_completion_failure() {
        let store = seeded_store().await;
        record_task_completion(&store, "agent-1", "research", false, 5.0).await;

        let spec = store.get("agent-1").unwrap();
        let metrics = spec.performance_by_task.get("research").unwrap();
        assert!((metrics.success_rate - 0.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_average_duration_accumulates() {
        let store = seeded_store().await;
        record_task_completion(&store, "agent-1", "research", true, 10.0).await;
        record_task_completion(&store, "agent-1", "research", true, 20.0).await;

        let spec = store.get("agent-1").unwrap();
        let metrics = spec.performance_by_task.get("research").unwrap();
        assert_eq!(metrics.task_count, 2);
        assert_eq!(metrics.average_task_duration, 15.0);
    }

    #[tokio::test]
    async fn test_record_critic_feedback() {
        let store = seeded_store().await;
        record_task_completion(&store, "agent-1", "research", true, 1.0).await;
        record_critic_feedback(&store, "agent-1", "research", 40.0).await;

        let spec = store.get("agent-1").unwrap();
        let metrics = spec.performance_by_task.get("research").unwrap();
        assert!((metrics.quality_score - (50.0 * 0.75 + 40.0 * 0.25)).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_record_critic_feedback_seeds_distinct_default_when_no_metrics_exist() {
        let store = seeded_store().await;
        record_critic_feedback(&store, "agent-1", "research", 100.0).await;

        let spec = store.get("agent-1").unwrap();
        let metrics = spec.performance_by_task.get("research").unwrap();
        assert_eq!(metrics.task_count, 1);
        assert!((metrics.quality_score - (50.0 * 0.75 + 100.0 * 0.25)).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_quality_score_clamped() {
        let store = seeded_store().await;
        for _ in 0..20 {
            record_critic_feedback(&store, "agent-1", "research", 100.0).await;
        }
        let spec = store.get("agent-1").unwrap();
        let metrics = spec.performance_by_task.get("research").unwrap();
        assert!(metrics.quality_score <= 100.0);
    }

    #[tokio::test]
    async fn test_unknown_agent_is_noop() {
        let store = seeded_store().await;
        record_task_completion(&store, "ghost", "research", true, 1.0).await;
        assert!(store.get("ghost").is_none());
    }
}
