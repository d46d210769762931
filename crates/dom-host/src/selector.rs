//! Selector grammar and matching
//!
//! Supported grammar: compound selectors made of `tag`, `#id`, `.class`,
//! `[attr]` and `[attr="value"]` parts, combined with the descendant
//! combinator (whitespace) and selector lists (commas). Anything outside
//! this grammar is a parse error, never a panic — callers decide whether
//! that means "invalid selector" or "skip this candidate".

use crate::document::DocumentInner;
use crate::errors::DomError;
use crate::node::NodeId;

#[derive(Debug, Clone)]
pub(crate) struct SelectorList {
    branches: Vec<ComplexSelector>,
}

#[derive(Debug, Clone)]
struct ComplexSelector {
    /// Left-to-right; the last compound is the subject.
    compounds: Vec<Compound>,
}

#[derive(Debug, Clone, Default)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<AttrMatcher>,
}

#[derive(Debug, Clone)]
struct AttrMatcher {
    name: String,
    value: Option<String>,
}

impl Compound {
    fn is_empty(&self) -> bool {
        self.tag.is_none() && self.id.is_none() && self.classes.is_empty() && self.attrs.is_empty()
    }
}

pub(crate) fn parse(input: &str) -> Result<SelectorList, DomError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(DomError::selector_parse(input, "empty selector"));
    }

    let mut branches = Vec::new();
    for branch in split_top_level(trimmed, Separator::Comma)
        .map_err(|reason| DomError::selector_parse(input, reason))?
    {
        let branch = branch.trim();
        if branch.is_empty() {
            return Err(DomError::selector_parse(input, "empty selector in list"));
        }
        let mut compounds = Vec::new();
        for part in split_top_level(branch, Separator::Whitespace)
            .map_err(|reason| DomError::selector_parse(input, reason))?
        {
            compounds
                .push(parse_compound(part).map_err(|reason| DomError::selector_parse(input, reason))?);
        }
        if compounds.is_empty() {
            return Err(DomError::selector_parse(input, "empty selector in list"));
        }
        branches.push(ComplexSelector { compounds });
    }
    Ok(SelectorList { branches })
}

/// All attached elements matching any branch, in document order.
pub(crate) fn query(inner: &DocumentInner, list: &SelectorList) -> Vec<NodeId> {
    inner
        .document_order()
        .into_iter()
        .filter(|id| {
            list.branches
                .iter()
                .any(|branch| matches_complex(inner, *id, branch))
        })
        .collect()
}

fn matches_complex(inner: &DocumentInner, node: NodeId, complex: &ComplexSelector) -> bool {
    let Some(subject) = complex.compounds.last() else {
        return false;
    };
    if !matches_compound(inner, node, subject) {
        return false;
    }

    // Descendant combinators: walk ancestors right-to-left, greedily taking
    // the nearest match. With descendant-only combinators the nearest match
    // leaves the largest remaining search space, so no backtracking needed.
    let mut remaining = complex.compounds.len() - 1;
    let mut cursor = inner.parent_of(node);
    while remaining > 0 {
        let want = &complex.compounds[remaining - 1];
        let mut found = false;
        while let Some(ancestor) = cursor {
            cursor = inner.parent_of(ancestor);
            if matches_compound(inner, ancestor, want) {
                found = true;
                break;
            }
        }
        if !found {
            return false;
        }
        remaining -= 1;
    }
    true
}

fn matches_compound(inner: &DocumentInner, id: NodeId, compound: &Compound) -> bool {
    let Some(node) = inner.node(id) else {
        return false;
    };
    if let Some(tag) = &compound.tag {
        if node.tag != *tag {
            return false;
        }
    }
    if let Some(want) = &compound.id {
        if node.attrs.get("id").map(String::as_str) != Some(want.as_str()) {
            return false;
        }
    }
    if !compound.classes.is_empty() {
        let classes = node.classes();
        if !compound.classes.iter().all(|c| classes.contains(c)) {
            return false;
        }
    }
    for matcher in &compound.attrs {
        match node.attrs.get(&matcher.name) {
            None => return false,
            Some(actual) => {
                if let Some(expected) = &matcher.value {
                    if actual != expected {
                        return false;
                    }
                }
            }
        }
    }
    true
}

#[derive(Clone, Copy, PartialEq)]
enum Separator {
    Comma,
    Whitespace,
}

/// Split outside brackets and quotes; errors on unbalanced input.
fn split_top_level(input: &str, sep: Separator) -> Result<Vec<&str>, String> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0usize;

    for (pos, ch) in input.char_indices() {
        if let Some(q) = quote {
            if ch == q {
                quote = None;
            }
            continue;
        }
        match ch {
            '"' | '\'' => quote = Some(ch),
            '[' => depth += 1,
            ']' => {
                depth = depth.checked_sub(1).ok_or("unbalanced ']'")?;
            }
            ',' if depth == 0 && sep == Separator::Comma => {
                parts.push(&input[start..pos]);
                start = pos + 1;
            }
            c if depth == 0 && sep == Separator::Whitespace && c.is_whitespace() => {
                if start < pos {
                    parts.push(&input[start..pos]);
                }
                start = pos + c.len_utf8();
            }
            _ => {}
        }
    }
    if quote.is_some() {
        return Err("unterminated quote".into());
    }
    if depth != 0 {
        return Err("unbalanced '['".into());
    }
    if start < input.len() {
        parts.push(&input[start..]);
    } else if sep == Separator::Comma {
        return Err("trailing separator".into());
    }
    Ok(parts)
}

fn parse_compound(part: &str) -> Result<Compound, String> {
    let chars: Vec<char> = part.chars().collect();
    let mut compound = Compound::default();
    let mut i = 0usize;

    if i < chars.len() && is_ident_start(chars[i]) {
        let ident = read_ident(&chars, &mut i);
        compound.tag = Some(ident.to_ascii_lowercase());
    }

    while i < chars.len() {
        match chars[i] {
            '#' => {
                i += 1;
                let ident = read_ident(&chars, &mut i);
                if ident.is_empty() {
                    return Err("expected identifier after '#'".into());
                }
                compound.id = Some(ident);
            }
            '.' => {
                i += 1;
                let ident = read_ident(&chars, &mut i);
                if ident.is_empty() {
                    return Err("expected identifier after '.'".into());
                }
                compound.classes.push(ident);
            }
            '[' => {
                let inner = read_bracketed(&chars, &mut i)?;
                compound.attrs.push(parse_attr(&inner)?);
            }
            other => {
                return Err(format!("unexpected character '{other}'"));
            }
        }
    }

    if compound.is_empty() {
        return Err("empty compound selector".into());
    }
    Ok(compound)
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '-'
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

fn read_ident(chars: &[char], i: &mut usize) -> String {
    let start = *i;
    while *i < chars.len() && is_ident_char(chars[*i]) {
        *i += 1;
    }
    chars[start..*i].iter().collect()
}

/// Consume a `[...]` group (opening bracket at `*i`), returning the inner
/// text with quotes preserved.
fn read_bracketed(chars: &[char], i: &mut usize) -> Result<String, String> {
    debug_assert_eq!(chars[*i], '[');
    *i += 1;
    let start = *i;
    let mut quote: Option<char> = None;
    while *i < chars.len() {
        let ch = chars[*i];
        if let Some(q) = quote {
            if ch == q {
                quote = None;
            }
        } else {
            match ch {
                '"' | '\'' => quote = Some(ch),
                ']' => {
                    let inner: String = chars[start..*i].iter().collect();
                    *i += 1;
                    return Ok(inner);
                }
                _ => {}
            }
        }
        *i += 1;
    }
    Err("unterminated attribute selector".into())
}

fn parse_attr(inner: &str) -> Result<AttrMatcher, String> {
    let inner = inner.trim();
    if inner.is_empty() {
        return Err("empty attribute selector".into());
    }
    match inner.split_once('=') {
        None => {
            if !inner.chars().all(is_ident_char) {
                return Err(format!("invalid attribute name '{inner}'"));
            }
            Ok(AttrMatcher {
                name: inner.to_string(),
                value: None,
            })
        }
        Some((name, raw_value)) => {
            let name = name.trim();
            if name.is_empty() || !name.chars().all(is_ident_char) {
                return Err(format!("invalid attribute name '{name}'"));
            }
            let raw_value = raw_value.trim();
            let value = if raw_value.len() >= 2
                && (raw_value.starts_with('"') && raw_value.ends_with('"')
                    || raw_value.starts_with('\'') && raw_value.ends_with('\''))
            {
                raw_value[1..raw_value.len() - 1].to_string()
            } else {
                raw_value.to_string()
            };
            Ok(AttrMatcher {
                name: name.to_string(),
                value: Some(value),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_compound_parts() {
        let list = parse("input#email.form-field[name=\"email\"]").unwrap();
        assert_eq!(list.branches.len(), 1);
        let compound = &list.branches[0].compounds[0];
        assert_eq!(compound.tag.as_deref(), Some("input"));
        assert_eq!(compound.id.as_deref(), Some("email"));
        assert_eq!(compound.classes, vec!["form-field".to_string()]);
        assert_eq!(compound.attrs[0].name, "name");
        assert_eq!(compound.attrs[0].value.as_deref(), Some("email"));
    }

    #[test]
    fn parses_descendant_and_list() {
        let list = parse("nav a[href], .card button").unwrap();
        assert_eq!(list.branches.len(), 2);
        assert_eq!(list.branches[0].compounds.len(), 2);
        assert_eq!(list.branches[1].compounds.len(), 2);
    }

    #[test]
    fn quoted_values_keep_spaces_and_commas() {
        let list = parse("a[href=\"/shop?a=1,2 b\"]").unwrap();
        let compound = &list.branches[0].compounds[0];
        assert_eq!(compound.attrs[0].value.as_deref(), Some("/shop?a=1,2 b"));
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse("").is_err());
        assert!(parse("   ").is_err());
        assert!(parse("a >> b").is_err());
        assert!(parse("div[unclosed").is_err());
        assert!(parse("a,,b").is_err());
        assert!(parse("#").is_err());
        assert!(parse("a:hover").is_err());
    }
}
