//! Error types for action execution
//!
//! Every variant is recovered into a `{success:false, error}` envelope at
//! the dispatch boundary; none of them crosses to the host as a failure.

use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum ActionError {
    /// CLICK/TYPE/wait request without the required index or selector.
    #[error("No target specified")]
    NoTarget,

    /// Feature index or selector resolved to nothing attached.
    #[error("Element not found: {0}")]
    NotFound(String),

    /// TYPE without text. The message is part of the host contract.
    #[error("No text to type")]
    MissingTextInput,

    /// Unrecognized action discriminator.
    #[error("Unknown action: {0}")]
    UnknownAction(String),

    /// Unrecognized event kind for the waiter.
    #[error("Invalid event type: {0}")]
    InvalidEvent(String),

    /// The waiter's budget elapsed before the event fired.
    #[error("Timed out after {0}ms")]
    Timeout(u64),
}
