//! Blocking wait-for-event primitive

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

use dom_host::{Document, DomEventKind, NodeId};
use element_locator::ElementLocator;
use feature_perceiver::FeaturePerceiver;

use crate::errors::ActionError;
use crate::memo::ClickedMemo;
use crate::model::{WaitOutcome, WaitRequest};
use crate::policy::WaitPolicy;

/// Waits for the page to emit a chosen event — the guidance-mode
/// primitive where a human performs the action instead of the engine.
///
/// Exactly one resolution per call: the event subscription races the
/// timer and both are torn down when either side wins.
pub struct EventWaiter {
    doc: Document,
    locator: Arc<ElementLocator>,
    perceiver: Arc<FeaturePerceiver>,
    clicked: ClickedMemo,
    policy: WaitPolicy,
}

impl EventWaiter {
    pub fn new(
        doc: Document,
        locator: Arc<ElementLocator>,
        perceiver: Arc<FeaturePerceiver>,
        clicked: ClickedMemo,
        policy: WaitPolicy,
    ) -> Self {
        Self {
            doc,
            locator,
            perceiver,
            clicked,
            policy,
        }
    }

    pub async fn wait_for(&self, request: &WaitRequest) -> WaitOutcome {
        match self.run(request).await {
            Ok(message) => {
                info!(event = %request.event, "wait resolved");
                WaitOutcome::ok(message)
            }
            Err(err) => {
                warn!(event = %request.event, %err, "wait failed");
                WaitOutcome::failure(&err)
            }
        }
    }

    async fn run(&self, request: &WaitRequest) -> Result<String, ActionError> {
        let kind = DomEventKind::parse(&request.event)
            .ok_or_else(|| ActionError::InvalidEvent(request.event.clone()))?;
        let timeout_ms = request.timeout_ms.unwrap_or(self.policy.default_timeout_ms);

        match kind {
            DomEventKind::Scroll => {
                // Scroll is observed page-wide, no target needed.
                self.await_event(None, &[DomEventKind::Scroll], timeout_ms)
                    .await?;
                Ok("Scroll detected".to_string())
            }
            DomEventKind::Click => {
                let node = self.resolve_target(request)?;
                self.await_event(Some(node), &[DomEventKind::Click], timeout_ms)
                    .await?;
                Ok("Click detected".to_string())
            }
            DomEventKind::Input | DomEventKind::Change => {
                let node = self.resolve_target(request)?;
                // Pages differ in which of the pair they fire; accept both.
                self.await_event(
                    Some(node),
                    &[DomEventKind::Input, DomEventKind::Change],
                    timeout_ms,
                )
                .await?;
                Ok("Input detected".to_string())
            }
        }
    }

    /// Selector preferred over index; the index path re-extracts exactly
    /// like the action executor does.
    fn resolve_target(&self, request: &WaitRequest) -> Result<NodeId, ActionError> {
        if let Some(selector) = &request.selector {
            return self
                .locator
                .resolve(selector)
                .ok_or_else(|| ActionError::NotFound(selector.clone()));
        }
        let index = request.target_index.ok_or(ActionError::NoTarget)?;
        let inventory = self.perceiver.extract(&self.locator, &self.clicked.snapshot());
        let feature = inventory
            .features
            .into_iter()
            .nth(index)
            .ok_or_else(|| ActionError::NotFound(format!("no feature at index {index}")))?;
        self.locator
            .resolve(&feature.selector)
            .ok_or_else(|| ActionError::NotFound(feature.selector))
    }

    async fn await_event(
        &self,
        target: Option<NodeId>,
        kinds: &[DomEventKind],
        timeout_ms: u64,
    ) -> Result<(), ActionError> {
        // Subscribe before racing so an event in the same tick cannot slip
        // between resolution and listener attachment.
        let mut rx = self.doc.events();
        let deadline = tokio::time::sleep(Duration::from_millis(timeout_ms));
        tokio::pin!(deadline);

        loop {
            tokio::select! {
                _ = &mut deadline => return Err(ActionError::Timeout(timeout_ms)),
                received = rx.recv() => match received {
                    Ok(event) => {
                        if kinds.contains(&event.kind)
                            && (target.is_none() || event.target == target)
                        {
                            return Ok(());
                        }
                        debug!(kind = event.kind.name(), "ignoring non-matching event");
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "event waiter lagged behind the bus");
                    }
                    Err(RecvError::Closed) => return Err(ActionError::Timeout(timeout_ms)),
                },
            }
        }
    }
}
