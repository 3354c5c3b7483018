//! Session identity tracking
//!
//! Exactly one session exists per conversation lifetime. The id is
//! server-assigned: absent until the first successful response supplies
//! one, then reused for every chat request and feedback submission until
//! an explicit reset. The tracker is a plain value threaded through call
//! sites — there is no global session state.

use tracing::debug;

/// Tracks the server-assigned session id for one conversation.
#[derive(Debug, Default)]
pub struct SessionTracker {
    session_id: Option<String>,
}

impl SessionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current session id, if the server has assigned one.
    pub fn current(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    pub fn is_active(&self) -> bool {
        self.session_id.is_some()
    }

    /// Record a server-supplied session id. Unconditionally overwrites:
    /// a new id fully replaces the old one, never a partial update.
    pub fn observe(&mut self, id: impl Into<String>) {
        let id = id.into();
        debug!(component = "session", session_id = %id, "session id observed");
        self.session_id = Some(id);
    }

    /// Clear the session. The only way an id ever goes away.
    pub fn reset(&mut self) {
        self.session_id = None;
    }
}
