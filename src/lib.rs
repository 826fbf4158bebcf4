//! Agent specialization & dispatch subsystem.
//!
//! Assigns roles to agents, tracks their rolling task performance,
//! dispatches work to the best-fit candidate for a role, and synthesizes
//! per-task prompts that merge a role's defaults with per-agent
//! overrides. See [`SpecializationSubsystem`] for the embedding surface.

pub mod specialization;

pub use specialization::{
    AgentFacts, AgentHost, AgentSpecialization, AgentStatus, DomainRegistry, GatewayError,
    HttpPersistenceGateway, InMemoryGateway, KnowledgeDomain, PersistenceGateway, Role,
    RoleRegistry, SpecializationConfig, SpecializationCustomizations, SpecializationError,
    SpecializationStore, SpecializationSubsystem, TaskPerformanceMetrics,
};
