//! Programmatic page construction
//!
//! Fixture files cover hosts; tests want something terser. `ElementSpec`
//! is a declarative element description and `PageBuilder` materializes a
//! whole tree of them into a [`Document`].

use std::collections::BTreeMap;

use crate::document::Document;
use crate::node::{NodeId, Rect};

/// Declarative description of one element and its subtree.
#[derive(Clone, Debug)]
pub struct ElementSpec {
    tag: String,
    attrs: BTreeMap<String, String>,
    styles: Vec<(String, String)>,
    rect: Option<Rect>,
    text: Option<String>,
    value: Option<String>,
    children: Vec<ElementSpec>,
}

impl ElementSpec {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: BTreeMap::new(),
            styles: Vec::new(),
            rect: None,
            text: None,
            value: None,
            children: Vec::new(),
        }
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    pub fn id(self, id: impl Into<String>) -> Self {
        self.attr("id", id)
    }

    pub fn class(self, classes: impl Into<String>) -> Self {
        self.attr("class", classes)
    }

    pub fn style(mut self, prop: impl Into<String>, value: impl Into<String>) -> Self {
        self.styles.push((prop.into(), value.into()));
        self
    }

    pub fn rect(mut self, x: f64, y: f64, width: f64, height: f64) -> Self {
        self.rect = Some(Rect::new(x, y, width, height));
        self
    }

    /// Default visible footprint for elements whose exact geometry the
    /// test does not care about.
    pub fn sized(self) -> Self {
        self.rect(0.0, 0.0, 120.0, 24.0)
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn child(mut self, child: ElementSpec) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = ElementSpec>) -> Self {
        self.children.extend(children);
        self
    }

    pub(crate) fn materialize(&self, doc: &Document, parent: NodeId) -> NodeId {
        let node = doc.create_element(&self.tag);
        for (name, value) in &self.attrs {
            doc.set_attr(node, name.clone(), value.clone());
        }
        for (prop, value) in &self.styles {
            doc.set_style(node, prop, value);
        }
        if let Some(rect) = self.rect {
            doc.set_rect(node, rect);
        }
        if let Some(text) = &self.text {
            doc.set_text(node, text.clone());
        }
        if let Some(value) = &self.value {
            doc.set_value(node, value.clone());
        }
        doc.append_child(parent, node)
            .expect("freshly created node attaches");
        for child in &self.children {
            child.materialize(doc, node);
        }
        node
    }
}

/// Builds a [`Document`] from [`ElementSpec`] trees.
pub struct PageBuilder {
    doc: Document,
}

impl PageBuilder {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            doc: Document::new(title, url),
        }
    }

    pub fn viewport(self, width: f64, height: f64) -> Self {
        self.doc.set_viewport(width, height);
        self
    }

    pub fn child(self, spec: ElementSpec) -> Self {
        spec.materialize(&self.doc, self.doc.root());
        self
    }

    pub fn build(self) -> Document {
        self.doc
    }
}
