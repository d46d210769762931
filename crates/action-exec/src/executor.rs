//! Primitive action execution

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use tracing::{debug, info, warn};

use dom_host::{Document, DomEventKind, NodeId};
use element_locator::ElementLocator;
use feature_perceiver::{Feature, FeaturePerceiver};
use highlight_overlay::Highlighter;
use pagepilot_core_types::ActionId;

use crate::errors::ActionError;
use crate::memo::ClickedMemo;
use crate::model::{ActionKind, ActionOutcome, ActionReport, ActionRequest};
use crate::policy::TempoPolicy;

/// Executes CLICK/TYPE/SCROLL/WAIT against the live document.
///
/// Calls are not serialized internally; the engine contract requires the
/// host to wait for one outcome before sending the next action.
pub struct ActionExecutor {
    doc: Document,
    locator: Arc<ElementLocator>,
    perceiver: Arc<FeaturePerceiver>,
    highlighter: Highlighter,
    clicked: ClickedMemo,
    tempo: TempoPolicy,
}

impl ActionExecutor {
    pub fn new(
        doc: Document,
        locator: Arc<ElementLocator>,
        perceiver: Arc<FeaturePerceiver>,
        highlighter: Highlighter,
        clicked: ClickedMemo,
        tempo: TempoPolicy,
    ) -> Self {
        Self {
            doc,
            locator,
            perceiver,
            highlighter,
            clicked,
            tempo,
        }
    }

    pub async fn execute(&self, request: &ActionRequest) -> ActionOutcome {
        let action_id = ActionId::new();
        let started_at = Utc::now();
        let start = Instant::now();

        info!(action_id = %action_id, action = %request.action, target = ?request.target_index, "executing action");

        let result = self.run(request).await;
        let report = ActionReport {
            started_at,
            latency_ms: start.elapsed().as_millis() as u64,
        };
        match result {
            Ok(message) => {
                info!(action_id = %action_id, latency_ms = report.latency_ms, "action completed");
                ActionOutcome::ok(message, report)
            }
            Err(err) => {
                warn!(action_id = %action_id, %err, "action failed");
                ActionOutcome::failure(&err, report)
            }
        }
    }

    async fn run(&self, request: &ActionRequest) -> Result<String, ActionError> {
        let kind = ActionKind::parse(&request.action)
            .ok_or_else(|| ActionError::UnknownAction(request.action.clone()))?;

        match kind {
            ActionKind::Scroll => {
                self.doc.scroll_by(self.tempo.scroll_step_px);
                // Smooth-scroll settle so follow-up screenshots are stable.
                tokio::time::sleep(Duration::from_millis(self.tempo.scroll_settle_ms)).await;
                Ok(format!("Scrolled down {}px", self.tempo.scroll_step_px))
            }
            ActionKind::Wait => {
                tokio::time::sleep(Duration::from_millis(self.tempo.wait_action_ms)).await;
                Ok(format!("Waited {}ms", self.tempo.wait_action_ms))
            }
            ActionKind::Click => {
                let index = request.target_index.ok_or(ActionError::NoTarget)?;
                let (feature, node) = self.locate(index)?;
                self.stage(node).await;

                self.highlighter.move_pointer_to(node);
                tokio::time::sleep(Duration::from_millis(self.tempo.pointer_reaction_ms)).await;
                self.doc.click(node);
                self.clicked.record(feature.selector.clone());
                Ok(format!("Clicked \"{}\"", feature.text))
            }
            ActionKind::Type => {
                let index = request.target_index.ok_or(ActionError::NoTarget)?;
                // Validate before any DOM work (even selector generation
                // stamps markers) so a bad request leaves no trace.
                let text = request
                    .text_input
                    .as_deref()
                    .ok_or(ActionError::MissingTextInput)?;
                let (feature, node) = self.locate(index)?;
                self.stage(node).await;

                self.doc.focus(node);
                self.doc.set_value(node, text);
                self.doc.dispatch(DomEventKind::Input, Some(node));
                self.doc.dispatch(DomEventKind::Change, Some(node));
                Ok(format!("Typed into \"{}\"", feature.text))
            }
        }
    }

    /// Fresh scan, then index → selector → live element. The re-extraction
    /// is mandatory: the caller's indices may predate DOM mutations.
    fn locate(&self, index: usize) -> Result<(Feature, NodeId), ActionError> {
        let inventory = self.perceiver.extract(&self.locator, &self.clicked.snapshot());
        let feature = inventory
            .features
            .into_iter()
            .nth(index)
            .ok_or_else(|| ActionError::NotFound(format!("no feature at index {index}")))?;
        let node = self
            .locator
            .resolve(&feature.selector)
            .ok_or_else(|| ActionError::NotFound(feature.selector.clone()))?;
        debug!(index, selector = %feature.selector, "target resolved");
        Ok((feature, node))
    }

    /// Visual staging: highlight, bring into view, pause so an observer
    /// can register the cue before the state changes.
    async fn stage(&self, node: NodeId) {
        self.highlighter.clear_all();
        self.highlighter.highlight(node, self.tempo.highlight_ms);
        self.doc.scroll_to_center(node);
        tokio::time::sleep(Duration::from_millis(self.tempo.pre_action_pause_ms)).await;
    }
}
