//! Inventory extraction passes

use std::collections::HashSet;

use tracing::debug;

use dom_host::{Document, NodeId};
use element_locator::ElementLocator;

use crate::heuristics::{
    in_navigation_region, is_action_button, is_button_like, is_named_anchor_target,
    is_product_context,
};
use crate::labels::{button_label, input_label, link_label, truncate_label};
use crate::model::{Feature, FeatureKind, PageInventory};
use crate::policy::ExtractPolicy;
use crate::visibility::{is_roughly_visible, is_visible};

/// Input types that are not typeable fields.
const EXCLUDED_INPUT_TYPES: [&str; 3] = ["hidden", "button", "submit"];

/// Extracts the feature inventory from one live document.
///
/// Extraction is synchronous and side-effect free apart from marker
/// stamping done by selector generation. It never fails: candidates that
/// cannot produce a selector or label are skipped individually.
pub struct FeaturePerceiver {
    doc: Document,
    policy: ExtractPolicy,
}

impl FeaturePerceiver {
    pub fn new(doc: Document, policy: ExtractPolicy) -> Self {
        Self { doc, policy }
    }

    pub fn policy(&self) -> &ExtractPolicy {
        &self.policy
    }

    /// Run a full scan. `clicked` is the engine's clicked-selector memo
    /// used to annotate `already_clicked`.
    pub fn extract(&self, locator: &ElementLocator, clicked: &HashSet<String>) -> PageInventory {
        let links = self.collect_links(locator);
        let inputs = self.collect_inputs(locator);
        let buttons = self.collect_buttons(locator);

        // Fixed category order reflects action priority for the planner:
        // links, then inputs, then buttons.
        let mut seen = HashSet::new();
        let mut features = Vec::new();
        for mut feature in links.into_iter().chain(inputs).chain(buttons) {
            if !seen.insert(feature.dedup_key()) {
                continue;
            }
            feature.index = features.len();
            feature.already_clicked = clicked.contains(&feature.selector);
            features.push(feature);
        }

        let message = format!("Found {} interactive features", features.len());
        debug!(count = features.len(), "extraction complete");
        PageInventory {
            page_title: self.doc.title(),
            page_url: self.doc.url(),
            features,
            message,
        }
    }

    fn collect_links(&self, locator: &ElementLocator) -> Vec<Feature> {
        let anchors: Vec<NodeId> = self
            .doc
            .elements()
            .into_iter()
            .filter(|node| self.doc.tag(*node).as_deref() == Some("a"))
            .collect();

        // Likely product anchors first, then the rest minus navigation
        // chrome; DOM order within each group.
        let product: Vec<NodeId> = anchors
            .iter()
            .copied()
            .filter(|node| is_product_context(&self.doc, *node))
            .collect();
        let other: Vec<NodeId> = anchors
            .iter()
            .copied()
            .filter(|node| {
                !is_product_context(&self.doc, *node) && !in_navigation_region(&self.doc, *node)
            })
            .collect();

        let mut seen_hrefs: HashSet<String> = HashSet::new();
        let mut out = Vec::new();
        for node in product.into_iter().chain(other) {
            if out.len() >= self.policy.max_links {
                break;
            }
            let Some(href) = self.doc.attr(node, "href") else {
                continue;
            };
            if href.trim().is_empty() || href.starts_with("javascript:") || href == "#" {
                continue;
            }
            if !seen_hrefs.insert(href.clone()) {
                continue;
            }
            if !is_visible(&self.doc, node) {
                continue;
            }
            let Some(label) = link_label(&self.doc, node) else {
                continue;
            };
            if let Some(fragment) = href.strip_prefix('#') {
                if !is_named_anchor_target(&self.doc, fragment) {
                    continue;
                }
            }
            out.push(Feature {
                index: 0,
                kind: FeatureKind::Link,
                text: truncate_label(&label, self.policy.label_max_chars),
                selector: locator.generate(node),
                href: Some(href),
                placeholder: None,
                aria_label: self.doc.attr(node, "aria-label"),
                value_len: None,
                already_clicked: false,
            });
        }
        out
    }

    fn collect_inputs(&self, locator: &ElementLocator) -> Vec<Feature> {
        let mut out = Vec::new();
        for node in self.doc.elements() {
            if out.len() >= self.policy.max_inputs {
                break;
            }
            if !self.is_typeable_field(node) {
                continue;
            }
            if !is_visible(&self.doc, node) {
                continue;
            }
            let label = input_label(&self.doc, node);
            let value_len = self
                .doc
                .value(node)
                .map(|value| value.chars().count())
                .unwrap_or(0);
            out.push(Feature {
                index: 0,
                kind: FeatureKind::Input,
                text: truncate_label(&label, self.policy.label_max_chars),
                selector: locator.generate(node),
                href: None,
                placeholder: self.doc.attr(node, "placeholder"),
                aria_label: self.doc.attr(node, "aria-label"),
                value_len: Some(value_len),
                already_clicked: false,
            });
        }
        out
    }

    fn collect_buttons(&self, locator: &ElementLocator) -> Vec<Feature> {
        let universe: Vec<NodeId> = self
            .doc
            .elements()
            .into_iter()
            .filter(|node| is_button_like(&self.doc, *node))
            .collect();

        let action: Vec<NodeId> = universe
            .iter()
            .copied()
            .filter(|node| is_action_button(&self.doc, *node))
            .collect();
        let plain: Vec<NodeId> = universe
            .iter()
            .copied()
            .filter(|node| !is_action_button(&self.doc, *node))
            .collect();

        let mut seen_selectors: HashSet<String> = HashSet::new();
        let mut out = Vec::new();
        for (node, relaxed) in action
            .into_iter()
            .map(|n| (n, true))
            .chain(plain.into_iter().map(|n| (n, false)))
        {
            if out.len() >= self.policy.max_buttons {
                break;
            }
            let visible = if relaxed {
                is_roughly_visible(&self.doc, node)
            } else {
                is_visible(&self.doc, node)
            };
            if !visible {
                continue;
            }
            let Some(label) = button_label(&self.doc, node) else {
                continue;
            };
            let selector = locator.generate(node);
            if !seen_selectors.insert(selector.clone()) {
                continue;
            }
            out.push(Feature {
                index: 0,
                kind: FeatureKind::Button,
                text: truncate_label(&label, self.policy.label_max_chars),
                selector,
                href: None,
                placeholder: None,
                aria_label: self.doc.attr(node, "aria-label"),
                value_len: None,
                already_clicked: false,
            });
        }
        out
    }

    fn is_typeable_field(&self, node: NodeId) -> bool {
        match self.doc.tag(node).as_deref() {
            Some("textarea") | Some("select") => true,
            Some("input") => {
                let kind = self
                    .doc
                    .attr(node, "type")
                    .map(|t| t.to_ascii_lowercase())
                    .unwrap_or_default();
                !EXCLUDED_INPUT_TYPES.contains(&kind.as_str())
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dom_host::{ElementSpec, PageBuilder};

    fn extract(doc: &Document) -> PageInventory {
        let locator = ElementLocator::new(doc.clone());
        let perceiver = FeaturePerceiver::new(doc.clone(), ExtractPolicy::default());
        perceiver.extract(&locator, &HashSet::new())
    }

    #[test]
    fn product_links_come_first_and_nav_is_excluded() {
        let doc = PageBuilder::new("Shop", "https://shop.test")
            .child(ElementSpec::new("nav").child(
                ElementSpec::new("a").attr("href", "/nav").text("Nav link").sized(),
            ))
            .child(ElementSpec::new("a").attr("href", "/about").text("About").sized())
            .child(
                ElementSpec::new("div").class("product-card").child(
                    ElementSpec::new("a").attr("href", "/p/1").text("Blue shirt").sized(),
                ),
            )
            .build();

        let inventory = extract(&doc);
        let links: Vec<&Feature> = inventory
            .features
            .iter()
            .filter(|f| f.kind == FeatureKind::Link)
            .collect();
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].text, "Blue shirt");
        assert_eq!(links[1].text, "About");
    }

    #[test]
    fn link_filters_apply() {
        let doc = PageBuilder::new("t", "https://example.test")
            .child(ElementSpec::new("a").text("no href").sized())
            .child(ElementSpec::new("a").attr("href", "javascript:void(0)").text("js").sized())
            .child(ElementSpec::new("a").attr("href", "#").text("hash").sized())
            .child(ElementSpec::new("a").attr("href", "#missing").text("ghost").sized())
            .child(ElementSpec::new("a").attr("href", "#faq").text("FAQ").sized())
            .child(ElementSpec::new("div").id("faq"))
            .child(ElementSpec::new("a").attr("href", "/dup").text("first").sized())
            .child(ElementSpec::new("a").attr("href", "/dup").text("second").sized())
            .child(ElementSpec::new("a").attr("href", "/unlabeled").sized())
            .build();

        let inventory = extract(&doc);
        let texts: Vec<&str> = inventory
            .features
            .iter()
            .filter(|f| f.kind == FeatureKind::Link)
            .map(|f| f.text.as_str())
            .collect();
        assert_eq!(texts, vec!["FAQ", "first"]);
    }

    #[test]
    fn hidden_inputs_and_excluded_types_are_skipped() {
        let doc = PageBuilder::new("t", "https://example.test")
            .child(ElementSpec::new("input").attr("name", "q").value("boots").sized())
            .child(ElementSpec::new("input").attr("type", "hidden").attr("name", "csrf"))
            .child(ElementSpec::new("input").attr("type", "submit").attr("name", "go").sized())
            .child(
                ElementSpec::new("input")
                    .attr("name", "ghost")
                    .style("display", "none")
                    .sized(),
            )
            .child(ElementSpec::new("textarea").attr("name", "notes").sized())
            .build();

        let inventory = extract(&doc);
        let inputs: Vec<&Feature> = inventory
            .features
            .iter()
            .filter(|f| f.kind == FeatureKind::Input)
            .collect();
        assert_eq!(inputs.len(), 2);
        assert_eq!(inputs[0].text, "q");
        assert_eq!(inputs[0].value_len, Some(5));
        assert_eq!(inputs[1].text, "notes");
        assert_eq!(inputs[1].value_len, Some(0));
    }

    #[test]
    fn action_buttons_precede_plain_ones() {
        let doc = PageBuilder::new("t", "https://example.test")
            .child(ElementSpec::new("button").class("btn").text("Details").sized())
            .child(ElementSpec::new("button").class("add-to-cart").text("Add to cart"))
            .build();

        let inventory = extract(&doc);
        let buttons: Vec<&Feature> = inventory
            .features
            .iter()
            .filter(|f| f.kind == FeatureKind::Button)
            .collect();
        // The action button is zero-sized but attached: relaxed visibility
        // admits it, and it still ranks first.
        assert_eq!(buttons.len(), 2);
        assert_eq!(buttons[0].text, "Add to cart");
        assert_eq!(buttons[1].text, "Details");
    }

    #[test]
    fn budgets_bound_each_category() {
        let mut builder = PageBuilder::new("t", "https://example.test");
        for i in 0..80 {
            builder = builder.child(
                ElementSpec::new("a")
                    .attr("href", format!("/l/{i}"))
                    .text(format!("Link {i}"))
                    .sized(),
            );
        }
        for i in 0..90 {
            builder = builder.child(
                ElementSpec::new("input")
                    .attr("name", format!("f{i}"))
                    .sized(),
            );
        }
        for i in 0..90 {
            builder = builder.child(
                ElementSpec::new("button")
                    .text(format!("Button {i}"))
                    .sized(),
            );
        }
        let inventory = extract(&builder.build());

        let count = |kind: FeatureKind| {
            inventory
                .features
                .iter()
                .filter(|f| f.kind == kind)
                .count()
        };
        assert_eq!(count(FeatureKind::Link), 60);
        assert_eq!(count(FeatureKind::Input), 75);
        assert_eq!(count(FeatureKind::Button), 75);
    }

    #[test]
    fn indices_are_dense_and_selectors_roundtrip() {
        let doc = PageBuilder::new("t", "https://example.test")
            .child(ElementSpec::new("a").attr("href", "/a").text("A").sized())
            .child(ElementSpec::new("input").attr("name", "q").sized())
            .child(ElementSpec::new("button").text("Go").sized())
            .build();
        let locator = ElementLocator::new(doc.clone());
        let perceiver = FeaturePerceiver::new(doc.clone(), ExtractPolicy::default());
        let inventory = perceiver.extract(&locator, &HashSet::new());

        for (i, feature) in inventory.features.iter().enumerate() {
            assert_eq!(feature.index, i);
            assert!(locator.resolve(&feature.selector).is_some());
        }
    }

    #[test]
    fn already_clicked_is_tagged_from_memo() {
        let doc = PageBuilder::new("t", "https://example.test")
            .child(ElementSpec::new("a").id("go").attr("href", "/a").text("A").sized())
            .build();
        let locator = ElementLocator::new(doc.clone());
        let perceiver = FeaturePerceiver::new(doc.clone(), ExtractPolicy::default());

        let mut clicked = HashSet::new();
        clicked.insert("#go".to_string());
        let inventory = perceiver.extract(&locator, &clicked);
        assert!(inventory.features[0].already_clicked);
    }
}
