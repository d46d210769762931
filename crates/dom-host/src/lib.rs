//! In-process live DOM for the PagePilot engine.
//!
//! Plays the role the real page plays for a content script: a mutable
//! element tree with attributes, inline styles, computed-style queries,
//! layout geometry, a native find-by-selector capability and synchronous
//! event dispatch that async waiters can observe through the event bus.
//!
//! The tree can change at any moment between engine calls; nothing here
//! caches layout or query results.

mod builder;
mod document;
mod errors;
mod events;
mod fixture;
mod node;
mod selector;

pub use builder::{ElementSpec, PageBuilder};
pub use document::Document;
pub use errors::DomError;
pub use events::{DomEventKind, PageEvent};
pub use fixture::{NodeFixture, PageFixture};
pub use node::{NodeId, Rect};
