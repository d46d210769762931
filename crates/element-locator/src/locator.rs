//! Selector generation and resolution

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use dom_host::{Document, NodeId};

use crate::markers::{marker_selector, parse_marker, MarkerStore, MARKER_ATTR};

/// Ids acceptable as `#id` selectors: a letter followed by word characters
/// or hyphens. Anything else risks a syntactically invalid selector.
static ID_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][\w-]*$").expect("static pattern compiles"));

/// Classes that describe transient UI state rather than element identity;
/// a selector built from them stops resolving as soon as the state flips.
const TRANSIENT_CLASS_PREFIXES: [&str; 5] = ["hover", "focus", "active", "selected", "disabled"];

const FORM_CONTROL_TAGS: [&str; 3] = ["input", "textarea", "select"];

const MAX_CLASS_PARTS: usize = 3;

/// Generates and resolves durable selectors against one document.
pub struct ElementLocator {
    doc: Document,
    markers: MarkerStore,
}

impl ElementLocator {
    pub fn new(doc: Document) -> Self {
        Self {
            doc,
            markers: MarkerStore::new(),
        }
    }

    /// Derive a selector for `node`, strict priority order. Non-synthetic
    /// candidates are accepted only when they match exactly this element;
    /// the marker fallback is terminal and never fails.
    pub fn generate(&self, node: NodeId) -> String {
        if let Some(id) = self.doc.attr(node, "id") {
            if ID_PATTERN.is_match(&id) {
                let candidate = format!("#{id}");
                if self.matches_only(node, &candidate) {
                    return candidate;
                }
            }
        }

        if let Some(tag) = self.doc.tag(node) {
            if FORM_CONTROL_TAGS.contains(&tag.as_str()) {
                if let Some(name) = self.doc.attr(node, "name") {
                    if !name.is_empty() {
                        let candidate = format!("{tag}[name=\"{name}\"]");
                        if self.matches_only(node, &candidate) {
                            return candidate;
                        }
                    }
                }
            }

            let classes: Vec<String> = self
                .doc
                .classes(node)
                .into_iter()
                .filter(|class| !is_transient_class(class))
                .take(MAX_CLASS_PARTS)
                .collect();
            if !classes.is_empty() {
                let candidate = format!("{tag}.{}", classes.join("."));
                if self.matches_only(node, &candidate) {
                    return candidate;
                }
            }
        }

        self.marker_for(node)
    }

    /// Resolve a selector back to a live element. Marker selectors consult
    /// the arena first and honor it only while the entry is still attached;
    /// everything else is a live query. Invalid selectors are logged and
    /// resolve to `None` rather than erroring.
    pub fn resolve(&self, selector: &str) -> Option<NodeId> {
        if let Some(id) = parse_marker(selector) {
            if let Some(node) = self.markers.get(id) {
                if self.doc.is_attached(node) {
                    return Some(node);
                }
                debug!(marker = id, "marker entry is detached, trying live query");
            }
        }

        match self.doc.query_first(selector) {
            Ok(found) => found,
            Err(err) => {
                warn!(selector, %err, "selector did not resolve");
                None
            }
        }
    }

    /// Number of marker entries handed out so far.
    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    fn marker_for(&self, node: NodeId) -> String {
        // An element stamped on an earlier scan keeps its marker, so the
        // selector stays stable across re-extractions.
        if let Some(existing) = self.doc.attr(node, MARKER_ATTR) {
            if let Ok(id) = existing.parse::<u64>() {
                self.markers.remember(id, node);
                return marker_selector(id);
            }
        }

        let id = self.markers.assign(node);
        self.doc.set_attr(node, MARKER_ATTR, id.to_string());
        marker_selector(id)
    }

    fn matches_only(&self, node: NodeId, candidate: &str) -> bool {
        match self.doc.query(candidate) {
            Ok(found) => found.len() == 1 && found[0] == node,
            Err(err) => {
                // Attribute values can embed characters the grammar cannot
                // express; the candidate is simply not usable.
                debug!(candidate, %err, "selector candidate rejected");
                false
            }
        }
    }
}

fn is_transient_class(class: &str) -> bool {
    let lowered = class.to_ascii_lowercase();
    TRANSIENT_CLASS_PREFIXES
        .iter()
        .any(|prefix| lowered.starts_with(prefix))
}
