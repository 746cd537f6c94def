//! Active visitor tracking.
//!
//! Clients send a heartbeat every few seconds while the page is open and a
//! leave signal when it closes.  There is no background timer: every call
//! sweeps sessions whose last heartbeat is older than the timeout, so the
//! reported count is as fresh as the latest request.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::util::Clock;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VisitorSession {
    pub session_id: String,
    pub first_seen_at: DateTime<Utc>,
    pub last_seen_at: DateTime<Utc>,
}

pub struct VisitorTracker {
    timeout: Duration,
    clock: Arc<dyn Clock>,
    sessions: Mutex<HashMap<String, VisitorSession>>,
}

impl VisitorTracker {
    pub fn new(timeout: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            timeout,
            clock,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Lock the map and drop expired sessions.  Callers do their own update
    /// under the same guard.
    fn swept(&self) -> (MutexGuard<'_, HashMap<String, VisitorSession>>, DateTime<Utc>) {
        let now = self.clock.now();
        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        let before = sessions.len();
        let timeout = self.timeout;
        sessions.retain(|_, s| now - s.last_seen_at <= timeout);
        let expired = before - sessions.len();
        if expired > 0 {
            tracing::debug!(expired, remaining = sessions.len(), "expired visitor sessions");
        }
        (sessions, now)
    }

    /// Insert or refresh a session.  Returns the count after the update.
    pub fn heartbeat(&self, session_id: &str) -> usize {
        let (mut sessions, now) = self.swept();
        sessions
            .entry(session_id.to_owned())
            .and_modify(|s| s.last_seen_at = now)
            .or_insert_with(|| VisitorSession {
                session_id: session_id.to_owned(),
                first_seen_at: now,
                last_seen_at: now,
            });
        sessions.len()
    }

    /// Remove a session if present.  Returns the count after the update.
    pub fn leave(&self, session_id: &str) -> usize {
        let (mut sessions, _) = self.swept();
        sessions.remove(session_id);
        sessions.len()
    }

    pub fn count(&self) -> usize {
        self.swept().0.len()
    }

    pub fn session(&self, session_id: &str) -> Option<VisitorSession> {
        self.swept().0.get(session_id).cloned()
    }
}
