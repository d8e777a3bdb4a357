//! Session registry
//!
//! Maps user ids to their sketch sessions. The registry is an explicitly
//! constructed value owned by the host and passed by reference to whatever
//! subsystem needs it; there is no process-wide singleton. The map lock
//! guards membership only; per-session work happens behind each session's
//! own lock, so unrelated users never contend.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::session::Session;

/// Registry of per-user sketch sessions
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<Uuid, Arc<Session>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The user's session, creating an empty one on first access
    pub fn get_or_create(&self, user_id: Uuid) -> Arc<Session> {
        if let Some(session) = self.sessions.read().get(&user_id) {
            return session.clone();
        }

        self.sessions
            .write()
            .entry(user_id)
            .or_insert_with(|| {
                debug!("Created sketch session for user {}", user_id);
                Arc::new(Session::new())
            })
            .clone()
    }

    /// The user's session, if one exists
    pub fn get(&self, user_id: Uuid) -> Option<Arc<Session>> {
        self.sessions.read().get(&user_id).cloned()
    }

    /// Evict the user's session, returning it if present
    pub fn remove(&self, user_id: Uuid) -> Option<Arc<Session>> {
        let removed = self.sessions.write().remove(&user_id);
        if removed.is_some() {
            debug!("Removed sketch session for user {}", user_id);
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }
}
