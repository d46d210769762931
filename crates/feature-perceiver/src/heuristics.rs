//! Category heuristics
//!
//! Fixed matcher sets for "likely product card" anchors, navigation
//! landmark regions and add-to-cart-like action buttons. The lists are
//! deliberately small; they rank candidates, they do not gate them.

use once_cell::sync::Lazy;
use regex::Regex;

use dom_host::{Document, NodeId};

/// Class fragments that mark product-card context.
const PRODUCT_CLASS_HINTS: [&str; 4] = ["product", "item-card", "collection-item", "grid-item"];

/// Attributes that mark product-card context.
const PRODUCT_ATTR_HINTS: [&str; 3] = ["data-product-id", "data-product", "data-sku"];

/// Landmark tags whose anchors are chrome, not content.
const NAV_REGION_TAGS: [&str; 3] = ["header", "footer", "nav"];

/// Tokens in class/id/name that mark an action button.
const ACTION_TOKENS: [&str; 6] = [
    "add-to-cart",
    "addtocart",
    "add_to_cart",
    "buy",
    "purchase",
    "checkout",
];

/// Residual stylesheet or markup fragments that must never become labels.
static CSS_RESIDUE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[{}<>]|@media|@import|@keyframes|:hover|:root|!important")
        .expect("static pattern compiles")
});

fn node_has_product_hint(doc: &Document, node: NodeId) -> bool {
    let classes = doc.classes(node);
    if classes.iter().any(|class| {
        let lowered = class.to_ascii_lowercase();
        PRODUCT_CLASS_HINTS
            .iter()
            .any(|hint| lowered.contains(hint))
    }) {
        return true;
    }
    PRODUCT_ATTR_HINTS
        .iter()
        .any(|attr| doc.attr(node, attr).is_some())
}

/// Whether the anchor sits in (or is itself) a product-card context.
pub(crate) fn is_product_context(doc: &Document, node: NodeId) -> bool {
    if node_has_product_hint(doc, node) {
        return true;
    }
    doc.ancestors(node)
        .into_iter()
        .any(|ancestor| node_has_product_hint(doc, ancestor))
}

/// Whether the node sits inside a header/footer/nav landmark or an
/// explicit `role="navigation"` region.
pub(crate) fn in_navigation_region(doc: &Document, node: NodeId) -> bool {
    doc.ancestors(node).into_iter().any(|ancestor| {
        doc.tag(ancestor)
            .map(|tag| NAV_REGION_TAGS.contains(&tag.as_str()))
            .unwrap_or(false)
            || doc.attr(ancestor, "role").as_deref() == Some("navigation")
    })
}

/// Button-role universe: `button` tags, explicit button roles, and
/// button/submit-typed inputs.
pub(crate) fn is_button_like(doc: &Document, node: NodeId) -> bool {
    match doc.tag(node).as_deref() {
        Some("button") => true,
        Some("input") => matches!(
            doc.attr(node, "type")
                .map(|t| t.to_ascii_lowercase())
                .as_deref(),
            Some("button") | Some("submit")
        ),
        _ => doc.attr(node, "role").as_deref() == Some("button"),
    }
}

/// Add-to-cart-like buttons: action token in class/id/name, or a submit
/// button inside a form.
pub(crate) fn is_action_button(doc: &Document, node: NodeId) -> bool {
    for attr in ["class", "id", "name"] {
        if let Some(value) = doc.attr(node, attr) {
            let lowered = value.to_ascii_lowercase();
            if ACTION_TOKENS.iter().any(|token| lowered.contains(token)) {
                return true;
            }
        }
    }
    let is_submit = doc
        .attr(node, "type")
        .map(|t| t.eq_ignore_ascii_case("submit"))
        .unwrap_or(false);
    is_submit
        && doc
            .ancestors(node)
            .into_iter()
            .any(|ancestor| doc.tag(ancestor).as_deref() == Some("form"))
}

/// Whether a candidate label still looks like leaked stylesheet/markup.
pub(crate) fn looks_like_css(text: &str) -> bool {
    CSS_RESIDUE.is_match(text)
}

/// Whether `#name` points at a real named anchor (`id` or `name` match).
pub(crate) fn is_named_anchor_target(doc: &Document, name: &str) -> bool {
    if name.is_empty() {
        return false;
    }
    doc.elements().into_iter().any(|node| {
        doc.attr(node, "id").as_deref() == Some(name)
            || doc.attr(node, "name").as_deref() == Some(name)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use dom_host::{ElementSpec, PageBuilder};

    #[test]
    fn product_context_via_ancestor_class() {
        let doc = PageBuilder::new("t", "https://example.test")
            .child(
                ElementSpec::new("div")
                    .class("product-card")
                    .child(ElementSpec::new("a").attr("href", "/p/1").sized()),
            )
            .child(ElementSpec::new("a").attr("href", "/about").sized())
            .build();
        let links = doc.query("a").unwrap();
        assert!(is_product_context(&doc, links[0]));
        assert!(!is_product_context(&doc, links[1]));
    }

    #[test]
    fn nav_region_by_tag_and_role() {
        let doc = PageBuilder::new("t", "https://example.test")
            .child(ElementSpec::new("nav").child(ElementSpec::new("a").attr("href", "/a").sized()))
            .child(
                ElementSpec::new("div")
                    .attr("role", "navigation")
                    .child(ElementSpec::new("a").attr("href", "/b").sized()),
            )
            .child(ElementSpec::new("a").attr("href", "/c").sized())
            .build();
        let links = doc.query("a").unwrap();
        assert!(in_navigation_region(&doc, links[0]));
        assert!(in_navigation_region(&doc, links[1]));
        assert!(!in_navigation_region(&doc, links[2]));
    }

    #[test]
    fn action_buttons_by_token_and_submit_in_form() {
        let doc = PageBuilder::new("t", "https://example.test")
            .child(ElementSpec::new("button").class("btn add-to-cart").sized())
            .child(
                ElementSpec::new("form")
                    .child(ElementSpec::new("button").attr("type", "submit").sized()),
            )
            .child(ElementSpec::new("button").attr("type", "submit").sized())
            .child(ElementSpec::new("button").class("btn").sized())
            .build();
        let buttons = doc.query("button").unwrap();
        assert!(is_action_button(&doc, buttons[0]));
        assert!(is_action_button(&doc, buttons[1]));
        // Submit outside a form is not an action button.
        assert!(!is_action_button(&doc, buttons[2]));
        assert!(!is_action_button(&doc, buttons[3]));
    }

    #[test]
    fn css_residue_is_rejected() {
        assert!(looks_like_css(".btn { color: red }"));
        assert!(looks_like_css("@media (max-width: 600px)"));
        assert!(!looks_like_css("Add to cart"));
    }
}
