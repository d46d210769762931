//! Action and wait wire shapes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::ActionError;

/// The executable primitives the engine supports.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum ActionKind {
    Click,
    Type,
    Scroll,
    Wait,
}

impl ActionKind {
    pub fn name(&self) -> &'static str {
        match self {
            ActionKind::Click => "CLICK",
            ActionKind::Type => "TYPE",
            ActionKind::Scroll => "SCROLL",
            ActionKind::Wait => "WAIT",
        }
    }

    /// Parse the external discriminator; `None` for unknown values.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_uppercase().as_str() {
            "CLICK" => Some(ActionKind::Click),
            "TYPE" => Some(ActionKind::Type),
            "SCROLL" => Some(ActionKind::Scroll),
            "WAIT" => Some(ActionKind::Wait),
            _ => None,
        }
    }
}

/// One EXECUTE_ACTION request as received from the host.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ActionRequest {
    pub action: String,
    #[serde(rename = "targetIndex", default, skip_serializing_if = "Option::is_none")]
    pub target_index: Option<usize>,
    #[serde(rename = "textInput", default, skip_serializing_if = "Option::is_none")]
    pub text_input: Option<String>,
}

impl ActionRequest {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            target_index: None,
            text_input: None,
        }
    }

    pub fn with_target(mut self, index: usize) -> Self {
        self.target_index = Some(index);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text_input = Some(text.into());
        self
    }
}

/// Timing block attached to every action outcome.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ActionReport {
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub started_at: DateTime<Utc>,
    pub latency_ms: u64,
}

/// Action result envelope: callers branch on `success`, never on a thrown
/// failure.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ActionOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<ActionReport>,
}

impl ActionOutcome {
    pub fn ok(message: impl Into<String>, report: ActionReport) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            error: None,
            report: Some(report),
        }
    }

    pub fn failure(error: &ActionError, report: ActionReport) -> Self {
        Self {
            success: false,
            message: None,
            error: Some(error.to_string()),
            report: Some(report),
        }
    }
}

/// One WAIT_FOR_EVENT request. `selector` is preferred over `target_index`
/// when both are present.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WaitRequest {
    pub event: String,
    #[serde(rename = "targetIndex", default, skip_serializing_if = "Option::is_none")]
    pub target_index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector: Option<String>,
    #[serde(rename = "timeoutMs", default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

impl WaitRequest {
    pub fn new(event: impl Into<String>) -> Self {
        Self {
            event: event.into(),
            target_index: None,
            selector: None,
            timeout_ms: None,
        }
    }

    pub fn with_selector(mut self, selector: impl Into<String>) -> Self {
        self.selector = Some(selector.into());
        self
    }

    pub fn with_target(mut self, index: usize) -> Self {
        self.target_index = Some(index);
        self
    }

    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }
}

/// Wait result envelope.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WaitOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl WaitOutcome {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            error: None,
        }
    }

    pub fn failure(error: &ActionError) -> Self {
        Self {
            success: false,
            message: None,
            error: Some(error.to_string()),
        }
    }
}
