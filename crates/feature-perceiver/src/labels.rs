//! Label derivation

use dom_host::{Document, NodeId};

use crate::heuristics::looks_like_css;

/// Tags whose subtrees are stripped before reading button text, so raw
/// stylesheet or vector markup never leaks into a label.
const CLEAN_TEXT_EXCLUDED: [&str; 3] = ["style", "script", "svg"];

pub(crate) fn truncate_label(label: &str, max_chars: usize) -> String {
    if label.chars().count() <= max_chars {
        return label.to_string();
    }
    label.chars().take(max_chars).collect()
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn non_empty(text: String) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Link label: trimmed visible text, else the aria-label. `None` when both
/// are empty (such links carry no signal for the planner).
pub(crate) fn link_label(doc: &Document, node: NodeId) -> Option<String> {
    non_empty(collapse_whitespace(&doc.text_content(node)))
        .or_else(|| doc.attr(node, "aria-label").and_then(non_empty))
}

/// Input label priority: associated `<label>` (for-match, wrapping,
/// aria-labelledby) → name → placeholder → type → literal "text".
pub(crate) fn input_label(doc: &Document, node: NodeId) -> String {
    if let Some(label) = associated_label_text(doc, node) {
        return label;
    }
    if let Some(name) = doc.attr(node, "name").and_then(non_empty) {
        return name;
    }
    if let Some(placeholder) = doc.attr(node, "placeholder").and_then(non_empty) {
        return placeholder;
    }
    if let Some(kind) = doc.attr(node, "type").and_then(non_empty) {
        return kind;
    }
    "text".to_string()
}

fn associated_label_text(doc: &Document, node: NodeId) -> Option<String> {
    // <label for="...">
    if let Some(id) = doc.attr(node, "id") {
        for candidate in doc.elements() {
            if doc.tag(candidate).as_deref() == Some("label")
                && doc.attr(candidate, "for").as_deref() == Some(id.as_str())
            {
                if let Some(text) = non_empty(collapse_whitespace(&doc.text_content(candidate))) {
                    return Some(text);
                }
            }
        }
    }
    // Wrapping <label>
    for ancestor in doc.ancestors(node) {
        if doc.tag(ancestor).as_deref() == Some("label") {
            if let Some(text) = non_empty(collapse_whitespace(&doc.text_content(ancestor))) {
                return Some(text);
            }
        }
    }
    // aria-labelledby
    if let Some(ids) = doc.attr(node, "aria-labelledby") {
        for id in ids.split_whitespace() {
            for candidate in doc.elements() {
                if doc.attr(candidate, "id").as_deref() == Some(id) {
                    if let Some(text) = non_empty(collapse_whitespace(&doc.text_content(candidate)))
                    {
                        return Some(text);
                    }
                }
            }
        }
    }
    None
}

/// Button label: clean text with style/script/svg subtrees stripped, else
/// aria-label, else the value attribute (submit inputs). Text still
/// matching CSS-syntax markers is treated as absent.
pub(crate) fn button_label(doc: &Document, node: NodeId) -> Option<String> {
    let clean = non_empty(collapse_whitespace(
        &doc.text_content_excluding(node, &CLEAN_TEXT_EXCLUDED),
    ))
    .filter(|text| !looks_like_css(text));

    clean
        .or_else(|| doc.attr(node, "aria-label").and_then(non_empty))
        .or_else(|| doc.attr(node, "value").and_then(non_empty))
}
