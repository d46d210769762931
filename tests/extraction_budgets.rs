//! Inventory invariants: budgets, density, ordering and the mixed-page
//! scenario.

use std::collections::HashSet;

use dom_host::{Document, ElementSpec, PageBuilder};
use feature_perceiver::{FeatureKind, PageInventory};
use pagepilot_cli::{Engine, EngineConfig};

fn inventory_of(doc: Document) -> PageInventory {
    Engine::new(doc, EngineConfig::default()).get_features()
}

/// 3 product links, 5 non-product links (2 in a nav landmark), 10 text
/// inputs (3 hidden), 2 add-to-cart buttons and 4 plain buttons.
fn mixed_page() -> Document {
    let mut builder = PageBuilder::new("Mixed", "https://shop.test/mixed");

    for i in 0..3 {
        builder = builder.child(
            ElementSpec::new("div").class("product-card").child(
                ElementSpec::new("a")
                    .attr("href", format!("/p/{i}"))
                    .text(format!("Product {i}"))
                    .rect(0.0, 100.0 + i as f64 * 40.0, 200.0, 28.0),
            ),
        );
    }

    builder = builder.child(
        ElementSpec::new("nav")
            .child(
                ElementSpec::new("a")
                    .attr("href", "/nav-a")
                    .text("Nav A")
                    .sized(),
            )
            .child(
                ElementSpec::new("a")
                    .attr("href", "/nav-b")
                    .text("Nav B")
                    .sized(),
            ),
    );
    for name in ["About", "Contact", "Blog"] {
        builder = builder.child(
            ElementSpec::new("a")
                .attr("href", format!("/{}", name.to_lowercase()))
                .text(name)
                .sized(),
        );
    }

    for i in 0..10 {
        let mut input = ElementSpec::new("input")
            .attr("name", format!("field{i}"))
            .rect(0.0, 300.0 + i as f64 * 40.0, 200.0, 30.0);
        if i < 3 {
            input = input.style("display", "none");
        }
        builder = builder.child(input);
    }

    for i in 0..2 {
        builder = builder.child(
            ElementSpec::new("button")
                .class("add-to-cart")
                .text(format!("Add to cart {i}"))
                .sized(),
        );
    }
    for i in 0..4 {
        builder = builder.child(
            ElementSpec::new("button")
                .text(format!("Plain {i}"))
                .sized(),
        );
    }

    builder.build()
}

#[test]
fn mixed_page_scenario_counts_and_ordering() {
    let inventory = inventory_of(mixed_page());
    assert_eq!(inventory.features.len(), 19);

    let kinds: Vec<FeatureKind> = inventory.features.iter().map(|f| f.kind).collect();
    let links = kinds.iter().filter(|k| **k == FeatureKind::Link).count();
    let inputs = kinds.iter().filter(|k| **k == FeatureKind::Input).count();
    let buttons = kinds.iter().filter(|k| **k == FeatureKind::Button).count();
    assert_eq!((links, inputs, buttons), (6, 7, 6));

    // Category blocks: links, then inputs, then buttons.
    assert!(kinds[..6].iter().all(|k| *k == FeatureKind::Link));
    assert!(kinds[6..13].iter().all(|k| *k == FeatureKind::Input));
    assert!(kinds[13..].iter().all(|k| *k == FeatureKind::Button));

    // Product links precede non-product links.
    let link_texts: Vec<&str> = inventory.features[..6]
        .iter()
        .map(|f| f.text.as_str())
        .collect();
    assert_eq!(
        link_texts,
        vec!["Product 0", "Product 1", "Product 2", "About", "Contact", "Blog"]
    );

    // Action buttons precede plain buttons.
    let button_texts: Vec<&str> = inventory.features[13..]
        .iter()
        .map(|f| f.text.as_str())
        .collect();
    assert_eq!(
        button_texts,
        vec![
            "Add to cart 0",
            "Add to cart 1",
            "Plain 0",
            "Plain 1",
            "Plain 2",
            "Plain 3"
        ]
    );
}

#[test]
fn indices_are_dense_zero_based() {
    let inventory = inventory_of(mixed_page());
    for (position, feature) in inventory.features.iter().enumerate() {
        assert_eq!(feature.index, position);
    }
}

#[test]
fn no_duplicate_type_text_href_triples() {
    let inventory = inventory_of(mixed_page());
    let mut seen = HashSet::new();
    for feature in &inventory.features {
        assert!(
            seen.insert(feature.dedup_key()),
            "duplicate key for feature {:?}",
            feature
        );
    }
}

#[test]
fn budgets_hold_on_oversized_pages() {
    let mut builder = PageBuilder::new("Big", "https://shop.test/big");
    for i in 0..100 {
        builder = builder
            .child(
                ElementSpec::new("a")
                    .attr("href", format!("/l/{i}"))
                    .text(format!("Link {i}"))
                    .sized(),
            )
            .child(
                ElementSpec::new("input")
                    .attr("name", format!("f{i}"))
                    .sized(),
            )
            .child(
                ElementSpec::new("button")
                    .text(format!("Button {i}"))
                    .sized(),
            );
    }
    let inventory = inventory_of(builder.build());

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
    assert_eq!(inventory.features.len(), 210);
    for (position, feature) in inventory.features.iter().enumerate() {
        assert_eq!(feature.index, position);
    }
}

#[test]
fn labels_cap_at_one_hundred_chars() {
    let doc = PageBuilder::new("t", "https://example.test")
        .child(
            ElementSpec::new("a")
                .attr("href", "/long")
                .text("x".repeat(300))
                .sized(),
        )
        .build();
    let inventory = inventory_of(doc);
    assert_eq!(inventory.features[0].text.chars().count(), 100);
}
