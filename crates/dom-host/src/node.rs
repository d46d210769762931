//! Node arena primitives

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Opaque identity of one element for the lifetime of its document.
///
/// Ids are monotone and never reused, so a stale id held across a removal
/// is detectable instead of silently pointing at a different element.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u64);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Layout rectangle in page coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const ZERO: Rect = Rect {
        x: 0.0,
        y: 0.0,
        width: 0.0,
        height: 0.0,
    };

    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// One element's stored state.
///
/// Inline style properties keep insertion order and verbatim values so a
/// snapshot/restore cycle reproduces the exact original strings.
#[derive(Clone, Debug)]
pub(crate) struct NodeData {
    pub tag: String,
    pub attrs: BTreeMap<String, String>,
    pub styles: Vec<(String, String)>,
    pub rect: Rect,
    pub text: Option<String>,
    pub value: Option<String>,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

impl NodeData {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_ascii_lowercase(),
            attrs: BTreeMap::new(),
            styles: Vec::new(),
            rect: Rect::ZERO,
            text: None,
            value: None,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn style(&self, prop: &str) -> Option<&str> {
        self.styles
            .iter()
            .find(|(name, _)| name == prop)
            .map(|(_, value)| value.as_str())
    }

    pub fn set_style(&mut self, prop: &str, value: &str) {
        if let Some(slot) = self.styles.iter_mut().find(|(name, _)| name == prop) {
            slot.1 = value.to_string();
        } else {
            self.styles.push((prop.to_string(), value.to_string()));
        }
    }

    pub fn remove_style(&mut self, prop: &str) {
        self.styles.retain(|(name, _)| name != prop);
    }

    pub fn classes(&self) -> Vec<String> {
        self.attrs
            .get("class")
            .map(|list| list.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default()
    }
}
