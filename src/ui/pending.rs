use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

use crate::forms::FormKey;

/// Actions that must not be submitted twice while in flight.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PendingAction {
    SubmitForm(FormKey),
    DeleteTeam(String),
    DeleteSelectedEmployees,
}

#[derive(Debug, Default)]
pub struct PendingActions {
    inflight: Mutex<HashSet<PendingAction>>,
}

/// Clears its action when dropped.
#[must_use]
pub struct PendingGuard<'a> {
    owner: &'a PendingActions,
    action: PendingAction,
}

impl PendingActions {
    pub fn new() -> Self {
        PendingActions::default()
    }

    /// `None` when the same action is already running.
    pub fn try_begin(&self, action: PendingAction) -> Option<PendingGuard<'_>> {
        let mut inflight = self.inflight.lock().unwrap_or_else(PoisonError::into_inner);
        if !inflight.insert(action.clone()) {
            return None;
        }
        Some(PendingGuard { owner: self, action })
    }

    pub fn is_pending(&self, action: &PendingAction) -> bool {
        self.inflight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(action)
    }

    /// Teams whose deletion is currently in flight.
    pub fn team_deletes(&self) -> HashSet<String> {
        self.inflight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter_map(|action| match action {
                PendingAction::DeleteTeam(id) => Some(id.clone()),
                _ => None,
            })
            .collect()
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.owner
            .inflight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.action);
    }
}
