//! Overlay box tracking and the pointer cue

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::debug;

use dom_host::{NodeId, Rect};

use crate::highlighter::Highlighter;

/// Attribute marking the decorative nodes this subsystem owns.
pub(crate) const VISUAL_MARKER_ATTR: &str = "data-pp-visual";

/// Frame cadence for the tracking loop.
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

const POINTER_SIZE_PX: f64 = 12.0;

#[derive(Default)]
pub(crate) struct OverlayState {
    tracked: Option<NodeId>,
    task: Option<JoinHandle<()>>,
    box_node: Option<NodeId>,
    pointer_node: Option<NodeId>,
}

impl Highlighter {
    /// Follow `node` with the overlay box on every frame tick. Starting a
    /// new track implicitly stops the previous one; tracking also stops by
    /// itself once the node detaches from the page.
    pub fn track(&self, node: NodeId) {
        self.stop_tracking();
        let box_node = self.ensure_box_node();
        self.overlay.lock().tracked = Some(node);

        let this = self.clone();
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(FRAME_INTERVAL);
            loop {
                ticker.tick().await;
                if !this.doc().is_attached(node) {
                    debug!(%node, "tracked element detached, stopping overlay");
                    break;
                }
                let rect = this.doc().bounding_rect(node);
                if rect.area() == 0.0 {
                    this.doc().set_style(box_node, "display", "none");
                } else {
                    position_box(&this, box_node, rect);
                }
            }
            {
                let mut overlay = this.overlay.lock();
                if overlay.tracked == Some(node) {
                    overlay.tracked = None;
                    overlay.task = None;
                }
            }
            this.hide_box();
        });

        self.overlay.lock().task = Some(task);
    }

    /// Cancel the frame loop and hide the overlay box. No-op when nothing
    /// is tracked.
    pub fn stop_tracking(&self) {
        let task = {
            let mut overlay = self.overlay.lock();
            overlay.tracked = None;
            overlay.task.take()
        };
        if let Some(task) = task {
            task.abort();
        }
        self.hide_box();
    }

    pub fn tracked(&self) -> Option<NodeId> {
        self.overlay.lock().tracked
    }

    /// Center the pointer cue on the target's bounding rect.
    pub fn move_pointer_to(&self, node: NodeId) {
        let pointer = self.ensure_pointer_node();
        let rect = self.doc().bounding_rect(node);
        let (cx, cy) = rect.center();
        self.doc()
            .set_style(pointer, "left", &format!("{}px", cx - POINTER_SIZE_PX / 2.0));
        self.doc()
            .set_style(pointer, "top", &format!("{}px", cy - POINTER_SIZE_PX / 2.0));
        self.doc().set_style(pointer, "display", "block");
    }

    pub(crate) fn hide_box(&self) {
        let box_node = self.overlay.lock().box_node;
        if let Some(box_node) = box_node {
            self.doc().set_style(box_node, "display", "none");
        }
    }

    fn ensure_box_node(&self) -> NodeId {
        {
            let overlay = self.overlay.lock();
            if let Some(existing) = overlay.box_node {
                return existing;
            }
        }
        let node = self.create_visual_node("box");
        self.doc().set_style(node, "border", "2px solid #ff4d4f");
        self.doc().set_style(node, "border-radius", "4px");
        self.overlay.lock().box_node = Some(node);
        node
    }

    fn ensure_pointer_node(&self) -> NodeId {
        {
            let overlay = self.overlay.lock();
            if let Some(existing) = overlay.pointer_node {
                return existing;
            }
        }
        let node = self.create_visual_node("pointer");
        self.doc()
            .set_style(node, "width", &format!("{POINTER_SIZE_PX}px"));
        self.doc()
            .set_style(node, "height", &format!("{POINTER_SIZE_PX}px"));
        self.doc().set_style(node, "border-radius", "50%");
        self.doc().set_style(node, "background", "#ff4d4f");
        self.overlay.lock().pointer_node = Some(node);
        node
    }

    fn create_visual_node(&self, role: &str) -> NodeId {
        let doc = self.doc();
        let node = doc.create_element("div");
        doc.set_attr(node, VISUAL_MARKER_ATTR, role);
        doc.set_style(node, "position", "fixed");
        doc.set_style(node, "pointer-events", "none");
        doc.set_style(node, "z-index", "2147483647");
        doc.set_style(node, "display", "none");
        if let Err(err) = doc.append_child(doc.root(), node) {
            debug!(%err, role, "could not attach visual node");
        }
        node
    }
}

fn position_box(highlighter: &Highlighter, box_node: NodeId, rect: Rect) {
    let doc = highlighter.doc();
    doc.set_style(box_node, "left", &format!("{}px", rect.x));
    doc.set_style(box_node, "top", &format!("{}px", rect.y));
    doc.set_style(box_node, "width", &format!("{}px", rect.width));
    doc.set_style(box_node, "height", &format!("{}px", rect.height));
    doc.set_style(box_node, "display", "block");
}
