use std::collections::HashMap;

use git2::Oid;

/// Children already laid out, keyed by the parent they are waiting on.
#[derive(Debug, Default)]
pub struct HistoryOids {
    history_oid: HashMap<Oid, Vec<Oid>>,
}

impl HistoryOids {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_history(&mut self, parent: Oid, child: Oid) {
        let children = self.history_oid.entry(parent).or_default();
        if !children.contains(&child) {
            children.push(child);
        }
    }

    /// Hands over the waiting children once the parent shows up.
    pub fn take(&mut self, oid: &Oid) -> Vec<Oid> {
        self.history_oid.remove(oid).unwrap_or_default()
    }

    /// Parents named by laid-out children but never reached.
    pub fn pending(&self) -> usize {
        self.history_oid.len()
    }
}
