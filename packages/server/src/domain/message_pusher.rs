//! Outbound delivery port.
//!
//! The transport layer registers one channel per session; use cases select
//! targets and push serialized events through this trait without touching
//! sockets.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

use super::value_object::SessionId;

/// Channel carrying serialized events to one session's socket task.
pub type PusherChannel = mpsc::UnboundedSender<String>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MessagePushError {
    #[error("session '{0}' is not registered")]
    SessionNotFound(String),
    #[error("failed to push message: {0}")]
    PushFailed(String),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// Register the outbound channel for a newly accepted session.
    async fn register_session(&self, session_id: SessionId, sender: PusherChannel);

    /// Drop a session's outbound channel.
    async fn unregister_session(&self, session_id: &SessionId);

    /// Unicast to one session. Fails when the session is unknown or its
    /// channel is closed.
    async fn push_to(&self, session_id: &SessionId, content: &str) -> Result<(), MessagePushError>;

    /// Best-effort fan-out to the given sessions; individual failures are
    /// tolerated.
    async fn broadcast(
        &self,
        targets: Vec<SessionId>,
        content: &str,
    ) -> Result<(), MessagePushError>;

    /// Best-effort fan-out to every registered session.
    async fn broadcast_all(&self, content: &str) -> Result<(), MessagePushError>;
}
