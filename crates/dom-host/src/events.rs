//! DOM event kinds published on the page bus

use serde::{Deserialize, Serialize};

use crate::node::NodeId;

/// Event families the engine can observe or synthesize.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DomEventKind {
    Click,
    Input,
    Change,
    Scroll,
}

impl DomEventKind {
    pub fn name(&self) -> &'static str {
        match self {
            DomEventKind::Click => "click",
            DomEventKind::Input => "input",
            DomEventKind::Change => "change",
            DomEventKind::Scroll => "scroll",
        }
    }

    /// Parse an external event discriminator; `None` for unknown kinds.
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "click" => Some(DomEventKind::Click),
            "input" => Some(DomEventKind::Input),
            "change" => Some(DomEventKind::Change),
            "scroll" => Some(DomEventKind::Scroll),
            _ => None,
        }
    }
}

/// One dispatched event as seen on the bus.
///
/// `target` is `None` for page-level events (scroll).
#[derive(Clone, Debug)]
pub struct PageEvent {
    pub kind: DomEventKind,
    pub target: Option<NodeId>,
}
