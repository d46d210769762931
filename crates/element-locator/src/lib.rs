//! Durable element locators.
//!
//! Feature indices shift on every scan; the selector is the only handle
//! durable enough to re-find an element later. Generation walks a strict
//! priority chain (id, form-control name, classes) and accepts a candidate
//! only if it matches exactly the originating element right now; when
//! nothing unique exists the element is stamped with a synthetic marker
//! attribute backed by an arena, which never fails.

mod locator;
mod markers;

pub use locator::ElementLocator;
pub use markers::MARKER_ATTR;
