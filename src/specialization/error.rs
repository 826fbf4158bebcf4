//! Error types for the agent specialization & dispatch subsystem.

use thiserror::Error;

/// Errors raised by the Assignment Controller and by explicit get/list
/// operations on the registries and store.
///
/// Dispatch and prompt synthesis never raise these — they fall back to a
/// not-found sentinel or a generic prompt instead (see `dispatcher.rs` and
/// `prompt.rs`).
#[derive(Debug, Error)]
pub enum SpecializationError {
    /// A role id did not resolve in the Role Registry.
    #[error("role not found: {0}")]
    RoleNotFound(String),

    /// An agent id is unknown to the host.
    #[error("agent not found: {0}")]
    AgentNotFound(String),

    /// No specialization record exists for the given agent id.
    #[error("specialization not found for agent: {0}")]
    SpecializationNotFound(String),

    /// A constructor argument failed validation (empty role/agent id).
    #[error("validation error: {0}")]
    ValidationError(String),

    /// The agent host refused a role side-effect during assignment.
    #[error("role application failed: {0}")]
    RoleApplicationFailed(String),
}

/// Errors internal to the Persistence Gateway.
///
/// These never escape the gateway's callers: `load_collection` returns an
/// empty list and `store_collection` is a no-op on failure, each logged at
/// `warn`. The type exists so the gateway's own implementation can use `?`
/// internally and so tests can assert on the failure mode.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The remote store could not be reached, timed out, or returned a
    /// non-success status.
    #[error("persistence unavailable: {0}")]
    Unavailable(String),

    /// The response body could not be parsed into the expected envelope
    /// shape.
    #[error("malformed envelope response: {0}")]
    Malformed(String),
}
