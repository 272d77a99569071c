//! Orchestrator error types.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrchestratorError {
    /// The event loop has shut down and no longer accepts events.
    #[error("Orchestrator is not running")]
    Stopped,
}
