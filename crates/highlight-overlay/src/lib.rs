//! Visual feedback for engine actions.
//!
//! Highlighting snapshots an element's inline `outline`/`box-shadow`
//! before forcing the red outline + glow, and restores the exact original
//! strings when the highlight clears. Restoration timers are guarded by a
//! per-record generation so a stale timer never clobbers a newer
//! highlight. The overlay box follows at most one element on a frame loop;
//! the pointer cue is a decorative node moved to an element's center
//! before synthetic clicks.

mod highlighter;
mod overlay;

pub use highlighter::Highlighter;
