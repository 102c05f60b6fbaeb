//! Expand/collapse state for result panels.
//!
//! The terminal renderer shows one panel per analysis kind. Panels start
//! collapsed; a kind that just produced a result is expanded so fresh
//! output is visible without an extra step. The state lives here, apart
//! from the results themselves, so toggling a panel can never touch the
//! stored data.

use std::collections::BTreeSet;

use crate::models::AnalysisKind;

/// Which panels are currently expanded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PanelSet {
    expanded: BTreeSet<AnalysisKind>,
}

impl PanelSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// A panel set with every kind expanded.
    pub fn all_expanded() -> Self {
        let mut panels = Self::new();
        for kind in AnalysisKind::ALL {
            panels.expand(kind);
        }
        panels
    }

    pub fn expand(&mut self, kind: AnalysisKind) {
        self.expanded.insert(kind);
    }

    pub fn collapse(&mut self, kind: AnalysisKind) {
        self.expanded.remove(&kind);
    }

    /// Flip a panel's state; returns the new state (`true` = expanded).
    pub fn toggle(&mut self, kind: AnalysisKind) -> bool {
        if self.expanded.remove(&kind) {
            false
        } else {
            self.expanded.insert(kind);
            true
        }
    }

    pub fn is_expanded(&self, kind: AnalysisKind) -> bool {
        self.expanded.contains(&kind)
    }
}
