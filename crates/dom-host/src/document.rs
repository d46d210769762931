//! The shared live document

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::broadcast;
use tracing::warn;

use pagepilot_event_bus::{EventBus, InMemoryBus};

use crate::errors::DomError;
use crate::events::{DomEventKind, PageEvent};
use crate::node::{NodeData, NodeId, Rect};
use crate::selector;

const DEFAULT_VIEWPORT: (f64, f64) = (1280.0, 720.0);

pub(crate) struct DocumentInner {
    nodes: HashMap<NodeId, NodeData>,
    root: NodeId,
    next_id: u64,
    title: String,
    url: String,
    viewport: (f64, f64),
    scroll: (f64, f64),
    focused: Option<NodeId>,
}

impl DocumentInner {
    pub(crate) fn node(&self, id: NodeId) -> Option<&NodeData> {
        self.nodes.get(&id)
    }

    pub(crate) fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(&id).and_then(|node| node.parent)
    }

    pub(crate) fn is_attached(&self, id: NodeId) -> bool {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            if current == self.root {
                return true;
            }
            cursor = self.parent_of(current);
        }
        false
    }

    /// Attached elements in depth-first document order, root included.
    pub(crate) fn document_order(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            order.push(id);
            if let Some(node) = self.nodes.get(&id) {
                for child in node.children.iter().rev() {
                    stack.push(*child);
                }
            }
        }
        order
    }

    fn hidden_by_display(&self, id: NodeId) -> bool {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            if let Some(node) = self.nodes.get(&current) {
                if node.style("display") == Some("none") {
                    return true;
                }
                cursor = node.parent;
            } else {
                return true;
            }
        }
        false
    }

    fn layout_rect(&self, id: NodeId) -> Rect {
        if !self.is_attached(id) || self.hidden_by_display(id) {
            return Rect::ZERO;
        }
        self.nodes.get(&id).map(|node| node.rect).unwrap_or(Rect::ZERO)
    }
}

/// Handle to one live page. Cheap to clone; all clones see the same tree.
///
/// Every method takes `&self` and locks internally, so no lock is ever held
/// across an await point.
#[derive(Clone)]
pub struct Document {
    inner: Arc<RwLock<DocumentInner>>,
    bus: Arc<InMemoryBus<PageEvent>>,
}

impl Document {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        let root = NodeId(0);
        let mut nodes = HashMap::new();
        nodes.insert(root, NodeData::new("body"));
        Self {
            inner: Arc::new(RwLock::new(DocumentInner {
                nodes,
                root,
                next_id: 1,
                title: title.into(),
                url: url.into(),
                viewport: DEFAULT_VIEWPORT,
                scroll: (0.0, 0.0),
                focused: None,
            })),
            bus: InMemoryBus::new(64),
        }
    }

    pub fn root(&self) -> NodeId {
        self.inner.read().root
    }

    pub fn title(&self) -> String {
        self.inner.read().title.clone()
    }

    pub fn url(&self) -> String {
        self.inner.read().url.clone()
    }

    pub fn set_title(&self, title: impl Into<String>) {
        self.inner.write().title = title.into();
    }

    pub fn set_url(&self, url: impl Into<String>) {
        self.inner.write().url = url.into();
    }

    pub fn viewport(&self) -> (f64, f64) {
        self.inner.read().viewport
    }

    pub fn set_viewport(&self, width: f64, height: f64) {
        self.inner.write().viewport = (width, height);
    }

    pub fn scroll_position(&self) -> (f64, f64) {
        self.inner.read().scroll
    }

    // ----- tree construction and mutation -----

    /// Create a detached element; attach it with [`Document::append_child`].
    pub fn create_element(&self, tag: impl Into<String>) -> NodeId {
        let mut inner = self.inner.write();
        let id = NodeId(inner.next_id);
        inner.next_id += 1;
        inner.nodes.insert(id, NodeData::new(tag));
        id
    }

    pub fn append_child(&self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        let mut inner = self.inner.write();
        if !inner.nodes.contains_key(&parent) {
            return Err(DomError::UnknownNode(parent));
        }
        if !inner.nodes.contains_key(&child) {
            return Err(DomError::UnknownNode(child));
        }
        if child == inner.root {
            return Err(DomError::Detached(child));
        }
        if let Some(old_parent) = inner.nodes.get(&child).and_then(|n| n.parent) {
            if let Some(old) = inner.nodes.get_mut(&old_parent) {
                old.children.retain(|c| *c != child);
            }
        }
        inner.nodes.get_mut(&child).expect("checked above").parent = Some(parent);
        inner
            .nodes
            .get_mut(&parent)
            .expect("checked above")
            .children
            .push(child);
        Ok(())
    }

    /// Detach a subtree. The nodes stay in the arena so stale ids resolve
    /// to "detached", never to a different element.
    pub fn remove(&self, node: NodeId) {
        let mut inner = self.inner.write();
        if node == inner.root {
            return;
        }
        let Some(parent) = inner.nodes.get(&node).and_then(|n| n.parent) else {
            return;
        };
        if let Some(parent_node) = inner.nodes.get_mut(&parent) {
            parent_node.children.retain(|c| *c != node);
        }
        if let Some(node_data) = inner.nodes.get_mut(&node) {
            node_data.parent = None;
        }
    }

    pub fn is_attached(&self, node: NodeId) -> bool {
        self.inner.read().is_attached(node)
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.inner.read().parent_of(node)
    }

    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.inner
            .read()
            .node(node)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    /// Ancestors from the immediate parent up to the root.
    pub fn ancestors(&self, node: NodeId) -> Vec<NodeId> {
        let inner = self.inner.read();
        let mut out = Vec::new();
        let mut cursor = inner.parent_of(node);
        while let Some(current) = cursor {
            out.push(current);
            cursor = inner.parent_of(current);
        }
        out
    }

    /// Attached elements in document order.
    pub fn elements(&self) -> Vec<NodeId> {
        self.inner.read().document_order()
    }

    pub fn node_count(&self) -> usize {
        self.inner.read().nodes.len()
    }

    // ----- element state -----

    pub fn tag(&self, node: NodeId) -> Option<String> {
        self.inner.read().node(node).map(|n| n.tag.clone())
    }

    pub fn attr(&self, node: NodeId, name: &str) -> Option<String> {
        self.inner
            .read()
            .node(node)
            .and_then(|n| n.attrs.get(name).cloned())
    }

    pub fn set_attr(&self, node: NodeId, name: impl Into<String>, value: impl Into<String>) {
        if let Some(data) = self.inner.write().nodes.get_mut(&node) {
            data.attrs.insert(name.into(), value.into());
        }
    }

    pub fn remove_attr(&self, node: NodeId, name: &str) {
        if let Some(data) = self.inner.write().nodes.get_mut(&node) {
            data.attrs.remove(name);
        }
    }

    pub fn classes(&self, node: NodeId) -> Vec<String> {
        self.inner
            .read()
            .node(node)
            .map(|n| n.classes())
            .unwrap_or_default()
    }

    pub fn style(&self, node: NodeId, prop: &str) -> Option<String> {
        self.inner
            .read()
            .node(node)
            .and_then(|n| n.style(prop).map(str::to_string))
    }

    pub fn set_style(&self, node: NodeId, prop: &str, value: &str) {
        if let Some(data) = self.inner.write().nodes.get_mut(&node) {
            data.set_style(prop, value);
        }
    }

    pub fn remove_style(&self, node: NodeId, prop: &str) {
        if let Some(data) = self.inner.write().nodes.get_mut(&node) {
            data.remove_style(prop);
        }
    }

    /// Computed value of `display`/`visibility`/`opacity`: the inline value
    /// if present, else the property default.
    pub fn computed_style(&self, node: NodeId, prop: &str) -> String {
        let fallback = match prop {
            "display" => "block",
            "visibility" => "visible",
            "opacity" => "1",
            _ => "",
        };
        self.style(node, prop)
            .unwrap_or_else(|| fallback.to_string())
    }

    pub fn set_rect(&self, node: NodeId, rect: Rect) {
        if let Some(data) = self.inner.write().nodes.get_mut(&node) {
            data.rect = rect;
        }
    }

    /// Layout rect in page coordinates; collapses to zero for detached
    /// nodes and for nodes inside a `display:none` subtree.
    pub fn layout_rect(&self, node: NodeId) -> Rect {
        self.inner.read().layout_rect(node)
    }

    /// Viewport-relative bounding rect (layout minus scroll offset).
    pub fn bounding_rect(&self, node: NodeId) -> Rect {
        let inner = self.inner.read();
        let rect = inner.layout_rect(node);
        if rect.area() == 0.0 {
            return rect;
        }
        Rect::new(
            rect.x - inner.scroll.0,
            rect.y - inner.scroll.1,
            rect.width,
            rect.height,
        )
    }

    pub fn own_text(&self, node: NodeId) -> Option<String> {
        self.inner.read().node(node).and_then(|n| n.text.clone())
    }

    pub fn set_text(&self, node: NodeId, text: impl Into<String>) {
        if let Some(data) = self.inner.write().nodes.get_mut(&node) {
            data.text = Some(text.into());
        }
    }

    /// Concatenated text of the node and its descendants.
    pub fn text_content(&self, node: NodeId) -> String {
        self.text_content_excluding(node, &[])
    }

    /// Text content skipping subtrees whose tag is in `excluded` — the
    /// clean-text read used for button labels (`style`, `script`, `svg`).
    pub fn text_content_excluding(&self, node: NodeId, excluded: &[&str]) -> String {
        let inner = self.inner.read();
        let mut pieces = Vec::new();
        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            let Some(data) = inner.node(id) else { continue };
            if id != node && excluded.contains(&data.tag.as_str()) {
                continue;
            }
            if let Some(text) = &data.text {
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    pieces.push(trimmed.to_string());
                }
            }
            for child in data.children.iter().rev() {
                stack.push(*child);
            }
        }
        pieces.join(" ")
    }

    pub fn value(&self, node: NodeId) -> Option<String> {
        self.inner.read().node(node).and_then(|n| n.value.clone())
    }

    pub fn set_value(&self, node: NodeId, value: impl Into<String>) {
        if let Some(data) = self.inner.write().nodes.get_mut(&node) {
            data.value = Some(value.into());
        }
    }

    pub fn focus(&self, node: NodeId) {
        self.inner.write().focused = Some(node);
    }

    pub fn focused(&self) -> Option<NodeId> {
        self.inner.read().focused
    }

    // ----- scrolling -----

    /// Scroll the viewport down by `dy` pixels (negative scrolls up).
    /// Fires a page-level scroll event.
    pub fn scroll_by(&self, dy: f64) {
        {
            let mut inner = self.inner.write();
            inner.scroll.1 = (inner.scroll.1 + dy).max(0.0);
        }
        self.dispatch(DomEventKind::Scroll, None);
    }

    /// Scroll so the node's layout rect is vertically centered in the
    /// viewport.
    pub fn scroll_to_center(&self, node: NodeId) {
        {
            let mut inner = self.inner.write();
            let rect = inner.layout_rect(node);
            if rect.area() == 0.0 {
                return;
            }
            let (_, viewport_h) = inner.viewport;
            let (_, center_y) = rect.center();
            inner.scroll.1 = (center_y - viewport_h / 2.0).max(0.0);
        }
        self.dispatch(DomEventKind::Scroll, None);
    }

    // ----- queries -----

    pub fn query(&self, selector: &str) -> Result<Vec<NodeId>, DomError> {
        let list = selector::parse(selector)?;
        let inner = self.inner.read();
        Ok(selector::query(&inner, &list))
    }

    pub fn query_first(&self, selector: &str) -> Result<Option<NodeId>, DomError> {
        Ok(self.query(selector)?.into_iter().next())
    }

    // ----- events -----

    pub fn dispatch(&self, kind: DomEventKind, target: Option<NodeId>) {
        if let Err(err) = self.bus.publish(PageEvent { kind, target }) {
            warn!(kind = kind.name(), %err, "dropping DOM event");
        }
    }

    /// Native click on an element.
    pub fn click(&self, node: NodeId) {
        self.dispatch(DomEventKind::Click, Some(node));
    }

    pub fn events(&self) -> broadcast::Receiver<PageEvent> {
        self.bus.subscribe()
    }
}
