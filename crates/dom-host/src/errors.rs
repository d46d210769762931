//! Error types for the DOM host

use thiserror::Error;

use crate::node::NodeId;

#[derive(Debug, Error, Clone)]
pub enum DomError {
    /// Selector string could not be parsed against the supported grammar.
    #[error("invalid selector '{selector}': {reason}")]
    SelectorParse { selector: String, reason: String },

    /// Node id does not exist in this document's arena.
    #[error("unknown node {0:?}")]
    UnknownNode(NodeId),

    /// Operation requires an attached node.
    #[error("node {0:?} is detached from the document")]
    Detached(NodeId),

    /// Page fixture could not be read or deserialized.
    #[error("fixture error: {0}")]
    Fixture(String),
}

impl DomError {
    pub fn selector_parse(selector: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::SelectorParse {
            selector: selector.into(),
            reason: reason.into(),
        }
    }
}
