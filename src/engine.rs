//! Engine assembly
//!
//! One [`Engine`] per page lifetime. It owns the element cache, the
//! clicked-elements memo and the highlight records explicitly — state is
//! constructed here and discarded with the page, never ambient.

use std::sync::Arc;

use tracing::info;

use action_exec::{
    ActionExecutor, ActionOutcome, ActionRequest, ClickedMemo, EventWaiter, WaitOutcome,
    WaitRequest,
};
use dom_host::{Document, NodeId};
use element_locator::ElementLocator;
use feature_perceiver::{FeaturePerceiver, PageInventory};
use highlight_overlay::Highlighter;
use pagepilot_core_types::PageId;

use crate::config::EngineConfig;
use crate::errors::EngineError;

pub struct Engine {
    page_id: PageId,
    doc: Document,
    locator: Arc<ElementLocator>,
    perceiver: Arc<FeaturePerceiver>,
    highlighter: Highlighter,
    clicked: ClickedMemo,
    executor: ActionExecutor,
    waiter: EventWaiter,
    config: EngineConfig,
}

impl Engine {
    pub fn new(doc: Document, config: EngineConfig) -> Self {
        let page_id = PageId::new();
        let locator = Arc::new(ElementLocator::new(doc.clone()));
        let perceiver = Arc::new(FeaturePerceiver::new(
            doc.clone(),
            config.extract.clone(),
        ));
        let highlighter = Highlighter::new(doc.clone());
        let clicked = ClickedMemo::new();
        let executor = ActionExecutor::new(
            doc.clone(),
            locator.clone(),
            perceiver.clone(),
            highlighter.clone(),
            clicked.clone(),
            config.tempo.clone(),
        );
        let waiter = EventWaiter::new(
            doc.clone(),
            locator.clone(),
            perceiver.clone(),
            clicked.clone(),
            config.wait.clone(),
        );
        info!(page = %page_id, url = %doc.url(), "engine attached to page");
        Self {
            page_id,
            doc,
            locator,
            perceiver,
            highlighter,
            clicked,
            executor,
            waiter,
            config,
        }
    }

    pub fn page_id(&self) -> &PageId {
        &self.page_id
    }

    pub fn doc(&self) -> &Document {
        &self.doc
    }

    /// Fresh feature inventory. Indices are only valid until the next
    /// scan; callers re-extract rather than caching.
    pub fn get_features(&self) -> PageInventory {
        self.perceiver.extract(&self.locator, &self.clicked.snapshot())
    }

    /// Highlight one element and start tracking it with the overlay box.
    /// Selector is preferred over index; the index path re-extracts.
    pub fn highlight_element(
        &self,
        target_index: Option<usize>,
        selector: Option<&str>,
        duration_ms: Option<i64>,
    ) -> Result<String, EngineError> {
        let node = self.resolve_highlight_target(target_index, selector)?;
        let duration = duration_ms.unwrap_or(self.config.tempo.highlight_ms);
        self.highlighter.highlight(node, duration);
        self.highlighter.track(node);
        Ok("Element highlighted".to_string())
    }

    pub fn clear_highlights(&self) {
        self.highlighter.clear_all();
    }

    pub async fn execute(&self, request: &ActionRequest) -> ActionOutcome {
        self.executor.execute(request).await
    }

    pub async fn wait_for(&self, request: &WaitRequest) -> WaitOutcome {
        self.waiter.wait_for(request).await
    }

    fn resolve_highlight_target(
        &self,
        target_index: Option<usize>,
        selector: Option<&str>,
    ) -> Result<NodeId, EngineError> {
        if let Some(selector) = selector {
            return self
                .locator
                .resolve(selector)
                .ok_or_else(|| EngineError::NotFound(selector.to_string()));
        }
        let index = target_index.ok_or(EngineError::NoTarget)?;
        let inventory = self.get_features();
        let feature = inventory
            .features
            .into_iter()
            .nth(index)
            .ok_or_else(|| EngineError::NotFound(format!("no feature at index {index}")))?;
        self.locator
            .resolve(&feature.selector)
            .ok_or(EngineError::NotFound(feature.selector))
    }
}
