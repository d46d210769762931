//! Highlight records and auto-restore

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::debug;

use dom_host::{Document, NodeId};

use crate::overlay::OverlayState;

/// Forced styling applied while an element is highlighted.
const HIGHLIGHT_OUTLINE: &str = "2px solid #ff4d4f";
const HIGHLIGHT_BOX_SHADOW: &str = "0 0 12px 4px rgba(255, 77, 79, 0.55)";

/// Pre-highlight inline style snapshot, keyed by element identity.
/// `None` means the property was absent and restoring removes it again.
struct HighlightRecord {
    outline: Option<String>,
    box_shadow: Option<String>,
    /// First-writer-wins guard: an auto-restore timer only fires if its
    /// generation still matches the record.
    generation: u64,
}

#[derive(Default)]
struct HighlightState {
    records: HashMap<NodeId, HighlightRecord>,
    next_generation: u64,
}

/// Owns all highlight records and the single overlay/pointer pair for one
/// document. Clones share state, which is what the executor's spawned
/// restore timers rely on.
#[derive(Clone)]
pub struct Highlighter {
    doc: Document,
    state: Arc<Mutex<HighlightState>>,
    pub(crate) overlay: Arc<Mutex<OverlayState>>,
}

impl Highlighter {
    pub fn new(doc: Document) -> Self {
        Self {
            doc,
            state: Arc::new(Mutex::new(HighlightState::default())),
            overlay: Arc::new(Mutex::new(OverlayState::default())),
        }
    }

    pub(crate) fn doc(&self) -> &Document {
        &self.doc
    }

    /// Highlight `node`. `duration_ms > 0` schedules auto-restore after
    /// that delay; `duration_ms <= 0` is sticky until [`Self::clear_all`].
    pub fn highlight(&self, node: NodeId, duration_ms: i64) {
        let generation = {
            let mut state = self.state.lock();
            let generation = state.next_generation;
            state.next_generation += 1;
            // First highlight snapshots the original styles; re-highlight
            // keeps the snapshot and just refreshes the timer guard.
            let outline = self.doc.style(node, "outline");
            let box_shadow = self.doc.style(node, "box-shadow");
            state
                .records
                .entry(node)
                .or_insert_with(|| HighlightRecord {
                    outline,
                    box_shadow,
                    generation,
                })
                .generation = generation;
            generation
        };

        self.doc.set_style(node, "outline", HIGHLIGHT_OUTLINE);
        self.doc.set_style(node, "box-shadow", HIGHLIGHT_BOX_SHADOW);

        if duration_ms > 0 {
            let this = self.clone();
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(duration_ms as u64)).await;
                this.restore_if_current(node, generation);
            });
        }
    }

    /// Restore every highlighted element immediately, forget all records
    /// and stop overlay tracking. Safe to call with nothing highlighted.
    pub fn clear_all(&self) {
        let records: Vec<(NodeId, HighlightRecord)> =
            self.state.lock().records.drain().collect();
        for (node, record) in &records {
            self.restore_styles(*node, record);
        }
        if !records.is_empty() {
            debug!(count = records.len(), "cleared highlights");
        }
        self.stop_tracking();
    }

    pub fn highlight_count(&self) -> usize {
        self.state.lock().records.len()
    }

    fn restore_if_current(&self, node: NodeId, generation: u64) {
        let record = {
            let mut state = self.state.lock();
            match state.records.get(&node) {
                Some(record) if record.generation == generation => state.records.remove(&node),
                _ => None,
            }
        };
        if let Some(record) = record {
            self.restore_styles(node, &record);
        }
    }

    fn restore_styles(&self, node: NodeId, record: &HighlightRecord) {
        // Remove the forced values first, then reapply exactly what was
        // snapshotted (absence included).
        self.doc.remove_style(node, "outline");
        self.doc.remove_style(node, "box-shadow");
        if let Some(outline) = &record.outline {
            self.doc.set_style(node, "outline", outline);
        }
        if let Some(box_shadow) = &record.box_shadow {
            self.doc.set_style(node, "box-shadow", box_shadow);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dom_host::{ElementSpec, PageBuilder};

    fn page_with_button() -> (Document, NodeId) {
        let doc = PageBuilder::new("t", "https://example.test")
            .child(
                ElementSpec::new("button")
                    .id("b")
                    .style("outline", "1px dotted blue")
                    .text("Go")
                    .sized(),
            )
            .build();
        let node = doc.query_first("#b").unwrap().unwrap();
        (doc, node)
    }

    #[tokio::test(start_paused = true)]
    async fn restores_original_styles_after_duration() {
        let (doc, node) = page_with_button();
        let highlighter = Highlighter::new(doc.clone());

        highlighter.highlight(node, 5000);
        assert_eq!(doc.style(node, "outline").as_deref(), Some(HIGHLIGHT_OUTLINE));

        tokio::time::sleep(Duration::from_millis(5050)).await;
        assert_eq!(doc.style(node, "outline").as_deref(), Some("1px dotted blue"));
        // box-shadow was absent before and must be absent again.
        assert_eq!(doc.style(node, "box-shadow"), None);
        assert_eq!(highlighter.highlight_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn rehighlight_refreshes_the_timer_and_keeps_the_snapshot() {
        let (doc, node) = page_with_button();
        let highlighter = Highlighter::new(doc.clone());

        highlighter.highlight(node, 1000);
        tokio::time::sleep(Duration::from_millis(600)).await;
        highlighter.highlight(node, 1000);
        // The first timer elapses but its generation is stale.
        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(doc.style(node, "outline").as_deref(), Some(HIGHLIGHT_OUTLINE));
        // The refreshed timer restores the original snapshot.
        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(doc.style(node, "outline").as_deref(), Some("1px dotted blue"));
    }

    #[tokio::test(start_paused = true)]
    async fn sticky_highlight_waits_for_clear() {
        let (doc, node) = page_with_button();
        let highlighter = Highlighter::new(doc.clone());

        highlighter.highlight(node, 0);
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(doc.style(node, "outline").as_deref(), Some(HIGHLIGHT_OUTLINE));

        highlighter.clear_all();
        assert_eq!(doc.style(node, "outline").as_deref(), Some("1px dotted blue"));
    }

    #[tokio::test(start_paused = true)]
    async fn clear_all_is_idempotent() {
        let (doc, _) = page_with_button();
        let highlighter = Highlighter::new(doc);
        highlighter.clear_all();
        highlighter.clear_all();
        assert_eq!(highlighter.highlight_count(), 0);
    }
}
