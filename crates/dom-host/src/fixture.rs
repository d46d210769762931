//! Serde page fixtures
//!
//! A fixture is the serializable form of a page: title, url, viewport and
//! the element tree. Hosts load one (YAML or JSON, decided by extension)
//! and get back a live [`Document`] the engine can operate on.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::errors::DomError;
use crate::node::{NodeId, Rect};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PageFixture {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub viewport: Option<[f64; 2]>,
    #[serde(default)]
    pub body: Vec<NodeFixture>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NodeFixture {
    pub tag: String,
    #[serde(default)]
    pub attrs: BTreeMap<String, String>,
    #[serde(default)]
    pub style: BTreeMap<String, String>,
    /// `[x, y, width, height]` in page coordinates.
    #[serde(default)]
    pub rect: Option<[f64; 4]>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub children: Vec<NodeFixture>,
}

impl PageFixture {
    pub fn from_yaml(input: &str) -> Result<Self, DomError> {
        serde_yaml::from_str(input).map_err(|err| DomError::Fixture(err.to_string()))
    }

    pub fn from_json(input: &str) -> Result<Self, DomError> {
        serde_json::from_str(input).map_err(|err| DomError::Fixture(err.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self, DomError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|err| DomError::Fixture(format!("{}: {err}", path.display())))?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json(&raw),
            _ => Self::from_yaml(&raw),
        }
    }

    pub fn into_document(self) -> Document {
        let doc = Document::new(self.title, self.url);
        if let Some([width, height]) = self.viewport {
            doc.set_viewport(width, height);
        }
        for node in &self.body {
            materialize(&doc, doc.root(), node);
        }
        doc
    }
}

fn materialize(doc: &Document, parent: NodeId, fixture: &NodeFixture) {
    let node = doc.create_element(&fixture.tag);
    for (name, value) in &fixture.attrs {
        doc.set_attr(node, name.clone(), value.clone());
    }
    for (prop, value) in &fixture.style {
        doc.set_style(node, prop, value);
    }
    if let Some([x, y, width, height]) = fixture.rect {
        doc.set_rect(node, Rect::new(x, y, width, height));
    }
    if let Some(text) = &fixture.text {
        doc.set_text(node, text.clone());
    }
    if let Some(value) = &fixture.value {
        doc.set_value(node, value.clone());
    }
    doc.append_child(parent, node)
        .expect("freshly created node attaches");
    for child in &fixture.children {
        materialize(doc, node, child);
    }
}
