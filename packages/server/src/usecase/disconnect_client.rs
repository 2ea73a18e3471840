//! UseCase: transport-level disconnect cleanup.
//!
//! Invoked when the underlying connection drops, with or without an explicit
//! `leave_room` first. Unregistering is guarded by session id so the cleanup
//! of a superseded connection never touches the session that replaced it.

use std::sync::Arc;

use crate::domain::{
    ClientIp, ConnectionRegistry, LeaveSnapshot, MessagePusher, RoomRegistry, SessionId,
};

/// Tears down a session after its connection dropped.
pub struct DisconnectClientUseCase {
    connections: Arc<dyn ConnectionRegistry>,
    rooms: Arc<dyn RoomRegistry>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl DisconnectClientUseCase {
    pub fn new(
        connections: Arc<dyn ConnectionRegistry>,
        rooms: Arc<dyn RoomRegistry>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            connections,
            rooms,
            message_pusher,
        }
    }

    /// Unregister the session and clean up its room membership.
    ///
    /// # Returns
    ///
    /// The room cleanup snapshot when the session was in a room, `None`
    /// otherwise (including when the unregister was stale).
    pub async fn execute(&self, ip: &ClientIp, session_id: &SessionId) -> Option<LeaveSnapshot> {
        let removed = self.connections.unregister(ip, session_id).await;
        self.message_pusher.unregister_session(session_id).await;

        let session = removed?;
        let code = session.current_room?;
        self.rooms.remove_member(&code, session_id).await
    }
}
