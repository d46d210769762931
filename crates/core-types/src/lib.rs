//! Shared identifiers and the common error type for the PagePilot engine.
//!
//! Every engine crate speaks in terms of these ids; keeping them in one leaf
//! crate avoids dependency cycles between the perceiver, locator and
//! executor layers.

use std::fmt;

use thiserror::Error;
use uuid::Uuid;

/// Message-style error shared across crate boundaries where a structured
/// error enum would leak internals.
#[derive(Debug, Error, Clone)]
pub enum PilotError {
    #[error("{message}")]
    Message { message: String },
}

impl PilotError {
    pub fn new(message: impl Into<String>) -> Self {
        Self::Message {
            message: message.into(),
        }
    }
}

/// Identity of one live page (one engine instance per page lifetime).
#[derive(Clone, Debug, Eq, PartialEq, Hash, serde::Serialize, serde::Deserialize)]
pub struct PageId(pub String);

impl PageId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for PageId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Correlation id stamped on every executed action for tracing.
#[derive(Clone, Debug, Eq, PartialEq, Hash, serde::Serialize, serde::Deserialize)]
pub struct ActionId(pub String);

impl ActionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for ActionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
