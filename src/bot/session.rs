// Per-user pending-request storage

use std::collections::HashMap;

use parking_lot::Mutex;
use teloxide::types::UserId;

/// Where a user is in the format/quality dialog. Terminal states are
/// represented by removing the session from the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    AwaitingFormat,
    AwaitingQuality,
}

/// Links waiting on a format/quality choice. `links` is never empty:
/// messages without extracted links never create a session.
#[derive(Debug, Clone)]
pub struct PendingRequest {
    pub links: Vec<String>,
    pub stage: Stage,
}

impl PendingRequest {
    pub fn new(links: Vec<String>) -> Self {
        debug_assert!(!links.is_empty());
        Self {
            links,
            stage: Stage::AwaitingFormat,
        }
    }
}

/// Session storage keyed by user. At most one request per user; `put`
/// replaces any prior request (last message wins).
pub trait SessionStore: Send + Sync {
    fn put(&self, user: UserId, request: PendingRequest);
    fn get(&self, user: UserId) -> Option<PendingRequest>;
    fn remove(&self, user: UserId) -> Option<PendingRequest>;
}

/// Process-local store; all state is lost on restart by design.
#[derive(Default)]
pub struct InMemorySessionStore {
    inner: Mutex<HashMap<UserId, PendingRequest>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for InMemorySessionStore {
    fn put(&self, user: UserId, request: PendingRequest) {
        self.inner.lock().insert(user, request);
    }

    fn get(&self, user: UserId) -> Option<PendingRequest> {
        self.inner.lock().get(&user).cloned()
    }

    fn remove(&self, user: UserId) -> Option<PendingRequest> {
        self.inner.lock().remove(&user)
    }
}
