//! End-to-end engine behavior through the public facade: action
//! choreography, highlight restore, wait races and the dispatch envelope.

use std::time::Duration;

use action_exec::{ActionRequest, WaitRequest};
use dom_host::{Document, DomEventKind, ElementSpec, PageBuilder};
use pagepilot_cli::{handle_line, Engine, EngineConfig};

fn shop_doc() -> Document {
    PageBuilder::new("Shop", "https://shop.test")
        .child(
            ElementSpec::new("a")
                .id("home")
                .attr("href", "/")
                .style("outline", "1px dashed green")
                .text("Home")
                .sized(),
        )
        .child(
            ElementSpec::new("input")
                .attr("name", "q")
                .attr("placeholder", "Search")
                .rect(0.0, 40.0, 200.0, 30.0),
        )
        .child(
            ElementSpec::new("button")
                .id("go")
                .text("Search")
                .rect(0.0, 80.0, 80.0, 30.0),
        )
        .build()
}

#[tokio::test(start_paused = true)]
async fn click_marks_already_clicked_on_the_next_scan() {
    let doc = shop_doc();
    let engine = Engine::new(doc, EngineConfig::default());

    let before = engine.get_features();
    assert!(before.features.iter().all(|f| !f.already_clicked));

    let outcome = engine
        .execute(&ActionRequest::new("CLICK").with_target(0))
        .await;
    assert!(outcome.success, "{:?}", outcome.error);

    let after = engine.get_features();
    assert!(after.features[0].already_clicked);
    assert!(after.features[1..].iter().all(|f| !f.already_clicked));
}

#[tokio::test(start_paused = true)]
async fn type_without_text_is_the_exact_contract_error() {
    let doc = shop_doc();
    let engine = Engine::new(doc.clone(), EngineConfig::default());

    let outcome = engine
        .execute(&ActionRequest::new("TYPE").with_target(1))
        .await;
    assert!(!outcome.success);
    assert_eq!(outcome.error.as_deref(), Some("No text to type"));

    let input = doc.query_first("input").unwrap().unwrap();
    assert_eq!(doc.value(input), None);
}

#[tokio::test(start_paused = true)]
async fn highlight_restores_byte_identical_styles() {
    let doc = shop_doc();
    let engine = Engine::new(doc.clone(), EngineConfig::default());
    let link = doc.query_first("#home").unwrap().unwrap();

    engine
        .highlight_element(None, Some("#home"), Some(1200))
        .unwrap();
    assert_ne!(doc.style(link, "outline").as_deref(), Some("1px dashed green"));

    tokio::time::sleep(Duration::from_millis(1300)).await;
    assert_eq!(doc.style(link, "outline").as_deref(), Some("1px dashed green"));
    assert_eq!(doc.style(link, "box-shadow"), None);
}

#[tokio::test(start_paused = true)]
async fn clear_highlights_is_idempotent_with_nothing_highlighted() {
    let engine = Engine::new(shop_doc(), EngineConfig::default());
    engine.clear_highlights();
    engine.clear_highlights();
}

#[tokio::test(start_paused = true)]
async fn wait_race_click_at_half_timeout_wins_once() {
    let doc = shop_doc();
    let engine = Engine::new(doc.clone(), EngineConfig::default());
    let button = doc.query_first("#go").unwrap().unwrap();

    let clicker = {
        let doc = doc.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(5000)).await;
            doc.click(button);
        })
    };

    let outcome = engine
        .wait_for(&WaitRequest::new("click").with_selector("#go").with_timeout(10_000))
        .await;
    assert!(outcome.success, "{:?}", outcome.error);
    clicker.await.unwrap();

    // The listener is gone: a later click resolves nothing, and a fresh
    // wait times out on its own budget.
    doc.click(button);
    let second = engine
        .wait_for(&WaitRequest::new("click").with_selector("#go").with_timeout(500))
        .await;
    assert!(!second.success);
}

#[tokio::test(start_paused = true)]
async fn guidance_flow_waits_for_the_user_to_act() {
    let doc = shop_doc();
    let engine = Engine::new(doc.clone(), EngineConfig::default());

    // Index path: feature 2 is the search button on this page.
    let typist = {
        let doc = doc.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(200)).await;
            let input = doc.query_first("input").unwrap().unwrap();
            doc.set_value(input, "boots");
            doc.dispatch(DomEventKind::Input, Some(input));
        })
    };
    let outcome = engine
        .wait_for(&WaitRequest::new("input").with_target(1).with_timeout(2000))
        .await;
    assert!(outcome.success, "{:?}", outcome.error);
    typist.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn dispatch_drives_a_full_session() {
    let engine = Engine::new(shop_doc(), EngineConfig::default());

    let ping = handle_line(&engine, r#"{"type":"PING"}"#).await;
    assert_eq!(ping["success"], true);

    let features = handle_line(&engine, r#"{"type":"GET_FEATURES"}"#).await;
    assert_eq!(features["success"], true);
    assert_eq!(features["pageUrl"], "https://shop.test");
    assert_eq!(features["features"].as_array().unwrap().len(), 3);

    let typed = handle_line(
        &engine,
        r#"{"type":"EXECUTE_ACTION","action":"TYPE","targetIndex":1,"textInput":"boots"}"#,
    )
    .await;
    assert_eq!(typed["success"], true, "{typed}");

    // The typed value is visible to the next scan as value_len.
    let rescan = handle_line(&engine, r#"{"type":"GET_FEATURES"}"#).await;
    let input_feature = &rescan["features"][1];
    assert_eq!(input_feature["type"], "input");
    assert_eq!(input_feature["value_len"], 5);

    let cleared = handle_line(&engine, r#"{"type":"CLEAR_HIGHLIGHTS"}"#).await;
    assert_eq!(cleared["success"], true);

    let scrolled = handle_line(&engine, r#"{"type":"EXECUTE_ACTION","action":"SCROLL"}"#).await;
    assert_eq!(scrolled["success"], true);
}
