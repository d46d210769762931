//! Feature wire shapes

use serde::{Deserialize, Serialize};

/// Category of an extracted feature.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureKind {
    Link,
    Input,
    Button,
}

impl FeatureKind {
    pub fn name(&self) -> &'static str {
        match self {
            FeatureKind::Link => "link",
            FeatureKind::Input => "input",
            FeatureKind::Button => "button",
        }
    }
}

/// One interactive element as exposed to the planning agent.
///
/// `index` is dense and zero-based in final inventory order but NOT stable
/// across scans; only `selector` survives re-extraction. Instances are
/// created fresh per scan and never mutated.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Feature {
    pub index: usize,
    #[serde(rename = "type")]
    pub kind: FeatureKind,
    pub text: String,
    pub selector: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aria_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_len: Option<usize>,
    pub already_clicked: bool,
}

impl Feature {
    /// Global dedup key: no two features in one inventory may share it.
    pub fn dedup_key(&self) -> (FeatureKind, String, String) {
        (
            self.kind,
            self.text.clone(),
            self.href.clone().unwrap_or_default(),
        )
    }
}

/// Extraction result handed back to the host.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PageInventory {
    #[serde(rename = "pageTitle")]
    pub page_title: String,
    #[serde(rename = "pageUrl")]
    pub page_url: String,
    pub features: Vec<Feature>,
    pub message: String,
}
