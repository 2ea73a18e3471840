//! WebSocket-backed `MessagePusher` implementation.
//!
//! The UI layer accepts the socket and hands over each session's
//! `UnboundedSender`; this implementation owns the sender map and performs
//! unicast, room fan-out, and global fan-out.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{MessagePushError, MessagePusher, PusherChannel, SessionId};

/// Pusher delivering serialized events through per-session channels.
#[derive(Default)]
pub struct WebSocketMessagePusher {
    /// Outbound channel per registered session, keyed by session id.
    sessions: Mutex<HashMap<String, PusherChannel>>,
}

impl WebSocketMessagePusher {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_session(&self, session_id: SessionId, sender: PusherChannel) {
        let mut sessions = self.sessions.lock().await;
        sessions.insert(session_id.as_str().to_string(), sender);
        tracing::debug!("Session '{}' registered to MessagePusher", session_id);
    }

    async fn unregister_session(&self, session_id: &SessionId) {
        let mut sessions = self.sessions.lock().await;
        sessions.remove(session_id.as_str());
        tracing::debug!("Session '{}' unregistered from MessagePusher", session_id);
    }

    async fn push_to(&self, session_id: &SessionId, content: &str) -> Result<(), MessagePushError> {
        let sessions = self.sessions.lock().await;

        if let Some(sender) = sessions.get(session_id.as_str()) {
            sender
                .send(content.to_string())
                .map_err(|e| MessagePushError::PushFailed(e.to_string()))?;
            tracing::debug!("Pushed message to session '{}'", session_id);
            Ok(())
        } else {
            Err(MessagePushError::SessionNotFound(
                session_id.as_str().to_string(),
            ))
        }
    }

    async fn broadcast(
        &self,
        targets: Vec<SessionId>,
        content: &str,
    ) -> Result<(), MessagePushError> {
        let sessions = self.sessions.lock().await;

        for target in targets {
            if let Some(sender) = sessions.get(target.as_str()) {
                // Individual send failures are tolerated during fan-out.
                if let Err(e) = sender.send(content.to_string()) {
                    tracing::warn!("Failed to push message to session '{}': {}", target, e);
                } else {
                    tracing::debug!("Broadcasted message to session '{}'", target);
                }
            } else {
                tracing::warn!("Session '{}' not found during broadcast, skipping", target);
            }
        }

        Ok(())
    }

    async fn broadcast_all(&self, content: &str) -> Result<(), MessagePushError> {
        let sessions = self.sessions.lock().await;

        for (session_id, sender) in sessions.iter() {
            if let Err(e) = sender.send(content.to_string()) {
                tracing::warn!("Failed to push message to session '{}': {}", session_id, e);
            }
        }

        Ok(())
    }
}
