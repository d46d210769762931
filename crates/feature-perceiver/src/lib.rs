//! Feature extraction for the PagePilot engine.
//!
//! Walks the live DOM and emits a bounded, ranked, de-duplicated inventory
//! of interactive elements — the only view of the page the planning agent
//! ever sees. Category budgets and label caps are policy, not happenstance;
//! see [`ExtractPolicy`].

mod extract;
mod heuristics;
mod labels;
mod model;
mod policy;
mod visibility;

pub use extract::FeaturePerceiver;
pub use model::{Feature, FeatureKind, PageInventory};
pub use policy::ExtractPolicy;
pub use visibility::{is_roughly_visible, is_visible};
