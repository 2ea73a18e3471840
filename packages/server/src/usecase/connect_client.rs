//! UseCase: connection acceptance.
//!
//! Enforces the one-session-per-identity rule: the identity is claimed in a
//! single atomic registry operation, and only an accepted session gets an
//! outbound channel.

use std::sync::Arc;

use crate::domain::{ConnectionRegistry, MessagePusher, PusherChannel, Session};

use super::error::ConnectError;

/// Accepts or rejects a new connection.
pub struct ConnectClientUseCase {
    connections: Arc<dyn ConnectionRegistry>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl ConnectClientUseCase {
    pub fn new(
        connections: Arc<dyn ConnectionRegistry>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            connections,
            message_pusher,
        }
    }

    /// Register the session under its identity and attach its outbound
    /// channel.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - the session is registered and reachable
    /// * `Err(ConnectError::DuplicateIdentity)` - the identity already has a
    ///   live session; nothing was registered
    pub async fn execute(
        &self,
        session: Session,
        sender: PusherChannel,
    ) -> Result<(), ConnectError> {
        let ip = session.ip.clone();
        let session_id = session.id.clone();

        if !self.connections.register_if_absent(session).await {
            return Err(ConnectError::DuplicateIdentity(ip.to_string()));
        }

        self.message_pusher.register_session(session_id, sender).await;

        Ok(())
    }
}
