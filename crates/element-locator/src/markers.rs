//! Synthetic marker arena
//!
//! Marker id → node, append-only for the page lifetime with a monotone
//! counter. Lookups must detect detached entries; the caller falls back to
//! a live query rather than receiving a stale handle.

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use once_cell::sync::Lazy;
use regex::Regex;

use dom_host::NodeId;

/// Attribute stamped on elements that fall through to the marker path.
pub const MARKER_ATTR: &str = "data-pp-ref";

static MARKER_SELECTOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^\[data-pp-ref="(\d+)"\]$"#).expect("static pattern compiles"));

#[derive(Default)]
pub(crate) struct MarkerStore {
    entries: DashMap<u64, NodeId>,
    next: AtomicU64,
}

impl MarkerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn assign(&self, node: NodeId) -> u64 {
        let id = self.next.fetch_add(1, Ordering::Relaxed) + 1;
        self.entries.insert(id, node);
        id
    }

    /// Re-associate a previously stamped marker id (seen on an element's
    /// attribute) with its node, keeping the counter ahead of it.
    pub fn remember(&self, id: u64, node: NodeId) {
        self.entries.insert(id, node);
        self.next.fetch_max(id, Ordering::Relaxed);
    }

    pub fn get(&self, id: u64) -> Option<NodeId> {
        self.entries.get(&id).map(|entry| *entry.value())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

pub(crate) fn marker_selector(id: u64) -> String {
    format!("[{MARKER_ATTR}=\"{id}\"]")
}

/// Extract the marker id if `selector` is exactly a marker selector.
pub(crate) fn parse_marker(selector: &str) -> Option<u64> {
    MARKER_SELECTOR
        .captures(selector)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}
