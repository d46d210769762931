//! Host-boundary errors

use thiserror::Error;

/// Errors surfaced by the engine facade outside the action/wait paths
/// (which carry their own `ActionError`). All of them end up as
/// `{success:false, error}` envelopes; none escapes to the host raw.
#[derive(Debug, Error, Clone)]
pub enum EngineError {
    #[error("No target specified")]
    NoTarget,

    #[error("Element not found: {0}")]
    NotFound(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("fixture error: {0}")]
    Fixture(String),
}
