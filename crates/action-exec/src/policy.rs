//! Timing and waiting policy
//!
//! The delays are tuned so a human observer or a screenshot-driven
//! verification step can register each visual cue before the page state
//! changes. They are configuration defaults, not constants to re-derive.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct TempoPolicy {
    /// Highlight duration around an action (auto-restore after this).
    pub highlight_ms: i64,
    /// Pause between highlighting and acting.
    pub pre_action_pause_ms: u64,
    /// Pointer-cue dwell before the synthetic click fires.
    pub pointer_reaction_ms: u64,
    /// Settle delay after a smooth viewport scroll.
    pub scroll_settle_ms: u64,
    /// SCROLL action viewport offset in pixels.
    pub scroll_step_px: f64,
    /// WAIT action fixed delay.
    pub wait_action_ms: u64,
}

impl Default for TempoPolicy {
    fn default() -> Self {
        Self {
            highlight_ms: 5000,
            pre_action_pause_ms: 500,
            pointer_reaction_ms: 800,
            scroll_settle_ms: 300,
            scroll_step_px: 600.0,
            wait_action_ms: 3000,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct WaitPolicy {
    /// Event waiter budget when the caller passes none.
    pub default_timeout_ms: u64,
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self {
            default_timeout_ms: 30_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_tuned_delays() {
        let tempo = TempoPolicy::default();
        assert_eq!(tempo.highlight_ms, 5000);
        assert_eq!(tempo.pre_action_pause_ms, 500);
        assert_eq!(tempo.pointer_reaction_ms, 800);
        assert_eq!(tempo.scroll_settle_ms, 300);
        assert_eq!(WaitPolicy::default().default_timeout_ms, 30_000);
    }
}
