//! Host request dispatch
//!
//! The engine's integration contract: serde-tagged requests in, plain
//! `{success, ...}` envelopes out. Malformed input and unknown request
//! types become error envelopes — a host must never see a transport-level
//! failure.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use action_exec::{ActionRequest, WaitRequest};

use crate::engine::Engine;

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub enum EngineRequest {
    #[serde(rename = "GET_FEATURES")]
    GetFeatures,

    #[serde(rename = "HIGHLIGHT_ELEMENT")]
    HighlightElement {
        #[serde(rename = "targetIndex", default)]
        target_index: Option<usize>,
        #[serde(default)]
        selector: Option<String>,
        /// Milliseconds; absent means the configured default, `<= 0` is
        /// sticky.
        #[serde(default)]
        duration: Option<i64>,
    },

    #[serde(rename = "CLEAR_HIGHLIGHTS")]
    ClearHighlights,

    #[serde(rename = "EXECUTE_ACTION")]
    ExecuteAction {
        #[serde(flatten)]
        request: ActionRequest,
    },

    #[serde(rename = "WAIT_FOR_EVENT")]
    WaitForEvent {
        #[serde(flatten)]
        request: WaitRequest,
    },

    /// Liveness probe; hosts use it to decide whether the engine is
    /// already present before injecting a new one.
    #[serde(rename = "PING")]
    Ping,
}

pub async fn handle_request(engine: &Engine, request: EngineRequest) -> Value {
    match request {
        EngineRequest::GetFeatures => {
            let inventory = engine.get_features();
            let mut value = to_envelope(&inventory);
            if let Value::Object(map) = &mut value {
                map.insert("success".to_string(), Value::Bool(true));
            }
            value
        }
        EngineRequest::HighlightElement {
            target_index,
            selector,
            duration,
        } => match engine.highlight_element(target_index, selector.as_deref(), duration) {
            Ok(message) => json!({ "success": true, "message": message }),
            Err(err) => json!({ "success": false, "error": err.to_string() }),
        },
        EngineRequest::ClearHighlights => {
            engine.clear_highlights();
            json!({ "success": true })
        }
        EngineRequest::ExecuteAction { request } => to_envelope(&engine.execute(&request).await),
        EngineRequest::WaitForEvent { request } => to_envelope(&engine.wait_for(&request).await),
        EngineRequest::Ping => json!({
            "success": true,
            "message": "pong",
            "engine": format!("pagepilot {}", env!("CARGO_PKG_VERSION")),
        }),
    }
}

/// Parse one request line and dispatch it. Parse failures (bad JSON,
/// unknown `type`, malformed payload) come back as error envelopes.
pub async fn handle_line(engine: &Engine, line: &str) -> Value {
    match serde_json::from_str::<EngineRequest>(line) {
        Ok(request) => {
            debug!(?request, "dispatching request");
            handle_request(engine, request).await
        }
        Err(err) => json!({ "success": false, "error": format!("invalid request: {err}") }),
    }
}

fn to_envelope<T: Serialize>(payload: &T) -> Value {
    serde_json::to_value(payload)
        .unwrap_or_else(|err| json!({ "success": false, "error": format!("serialization: {err}") }))
}
