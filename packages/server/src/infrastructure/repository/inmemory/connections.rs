//! In-memory `ConnectionRegistry` implementation.
//!
//! A mutex-guarded map from identity to its single session. Each trait
//! method holds the lock for the whole check-then-mutate sequence, which is
//! what keeps a concurrent register/unregister pair all-or-nothing.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ClientIp, ConnectionRegistry, RoomCode, Session, SessionId, Username};

/// In-memory connection registry keyed by client identity.
#[derive(Default)]
pub struct InMemoryConnectionRegistry {
    sessions: Mutex<HashMap<String, Session>>,
}

impl InMemoryConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConnectionRegistry for InMemoryConnectionRegistry {
    async fn register_if_absent(&self, session: Session) -> bool {
        let mut sessions = self.sessions.lock().await;
        if sessions.contains_key(session.ip.as_str()) {
            return false;
        }
        sessions.insert(session.ip.as_str().to_string(), session);
        true
    }

    async fn unregister(&self, ip: &ClientIp, session_id: &SessionId) -> Option<Session> {
        let mut sessions = self.sessions.lock().await;
        // A superseded session must never evict the one that replaced it.
        match sessions.get(ip.as_str()) {
            Some(stored) if &stored.id == session_id => sessions.remove(ip.as_str()),
            _ => None,
        }
    }

    async fn assign_room(&self, ip: &ClientIp, code: RoomCode, username: Username) {
        let mut sessions = self.sessions.lock().await;
        if let Some(session) = sessions.get_mut(ip.as_str()) {
            session.enter_room(code, username);
        }
    }

    async fn clear_room(&self, ip: &ClientIp) {
        let mut sessions = self.sessions.lock().await;
        if let Some(session) = sessions.get_mut(ip.as_str()) {
            session.leave_room();
        }
    }

    async fn session(&self, ip: &ClientIp) -> Option<Session> {
        let sessions = self.sessions.lock().await;
        sessions.get(ip.as_str()).cloned()
    }

    async fn connection_count(&self) -> usize {
        let sessions = self.sessions.lock().await;
        sessions.len()
    }
}
