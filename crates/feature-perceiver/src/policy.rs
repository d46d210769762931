//! Extraction policy knobs
//!
//! The budgets were tuned empirically against real storefronts; they are
//! configuration defaults, not constants to re-derive.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractPolicy {
    /// Accepted link features per scan.
    pub max_links: usize,
    /// Accepted input features per scan.
    pub max_inputs: usize,
    /// Accepted button features per scan.
    pub max_buttons: usize,
    /// Label truncation length in characters.
    pub label_max_chars: usize,
}

impl Default for ExtractPolicy {
    fn default() -> Self {
        Self {
            max_links: 60,
            max_inputs: 75,
            max_buttons: 75,
            label_max_chars: 100,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_tuned_budgets() {
        let policy = ExtractPolicy::default();
        assert_eq!(policy.max_links, 60);
        assert_eq!(policy.max_inputs, 75);
        assert_eq!(policy.max_buttons, 75);
        assert_eq!(policy.label_max_chars, 100);
    }
}
