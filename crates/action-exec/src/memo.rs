//! Clicked-elements memo
//!
//! Selectors CLICK has fired on, kept for the page lifetime and never
//! cleared automatically. Later extractions read it to annotate
//! `already_clicked` — the planner's loop-avoidance signal.

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::Mutex;

#[derive(Clone, Default)]
pub struct ClickedMemo {
    inner: Arc<Mutex<HashSet<String>>>,
}

impl ClickedMemo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, selector: impl Into<String>) {
        self.inner.lock().insert(selector.into());
    }

    pub fn contains(&self, selector: &str) -> bool {
        self.inner.lock().contains(selector)
    }

    pub fn snapshot(&self) -> HashSet<String> {
        self.inner.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memo_accumulates_and_shares() {
        let memo = ClickedMemo::new();
        let alias = memo.clone();
        memo.record("#cta");
        assert!(alias.contains("#cta"));
        assert_eq!(alias.len(), 1);
        assert!(alias.snapshot().contains("#cta"));
    }
}
