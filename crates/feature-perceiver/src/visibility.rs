//! Interactability predicates

use dom_host::{Document, NodeId};

/// Strict visibility: computed display, visibility and opacity all permit
/// rendering and the layout box has non-zero width and height.
///
/// Opacity is compared as the string `"0"`, matching how pages tend to set
/// it; `0.01` tricks count as visible, which is the useful behavior for an
/// interaction agent.
pub fn is_visible(doc: &Document, node: NodeId) -> bool {
    if doc.computed_style(node, "display") == "none" {
        return false;
    }
    if doc.computed_style(node, "visibility") == "hidden" {
        return false;
    }
    if doc.computed_style(node, "opacity") == "0" {
        return false;
    }
    let rect = doc.layout_rect(node);
    rect.width > 0.0 && rect.height > 0.0
}

/// Relaxed check for action buttons, which are frequently styled to zero
/// size or revealed on hover: either layout dimension non-zero, or simply
/// still attached to the page.
pub fn is_roughly_visible(doc: &Document, node: NodeId) -> bool {
    let rect = doc.layout_rect(node);
    rect.width > 0.0 || rect.height > 0.0 || doc.is_attached(node)
}
