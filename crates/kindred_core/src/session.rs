//! Per-user search sessions and the registry serializing access to them.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;

use crate::id::UserId;
use crate::profile::{Candidate, SearchCriteria};
use crate::source::PageCursor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Cycling candidates.
    Active,
    /// End marker consumed and nothing pending; advances report exhaustion
    /// until the session is replaced.
    Exhausted,
}

/// Mutable cursor of one user's search. Plain data; every transition is
/// driven by the engine while it holds the user's slot lock.
#[derive(Debug, Clone)]
pub struct SearchSession {
    pub criteria: SearchCriteria,

    /// Position of the next upstream fetch; `None` once the end marker was
    /// consumed.
    pub cursor: Option<PageCursor>,

    /// Candidate currently presented and awaiting a decision.
    pub pending: Option<Candidate>,

    pub state: SessionState,
}

impl SearchSession {
    pub fn new(criteria: SearchCriteria) -> Self {
        Self {
            criteria,
            cursor: Some(PageCursor::START),
            pending: None,
            state: SessionState::Active,
        }
    }
}

/// One lockable slot per user; an absent session is `None`.
pub type SessionSlot = Arc<Mutex<Option<SearchSession>>>;

/// Concurrent map of per-user slots. Commands for one user serialize on the
/// slot mutex; unrelated users never contend on a shared lock.
#[derive(Default)]
pub struct SessionRegistry {
    slots: DashMap<UserId, SessionSlot>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The user's slot, created empty on first use.
    pub fn slot(&self, user_id: &UserId) -> SessionSlot {
        self.slots.entry(user_id.clone()).or_default().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_user_gets_the_same_slot() {
        let registry = SessionRegistry::new();
        let a = registry.slot(&UserId::new("u1"));
        let b = registry.slot(&UserId::new("u1"));
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn different_users_get_independent_slots() {
        let registry = SessionRegistry::new();
        let a = registry.slot(&UserId::new("u1"));
        let b = registry.slot(&UserId::new("u2"));
        assert!(!Arc::ptr_eq(&a, &b));
    }
}
