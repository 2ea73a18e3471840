//! UseCase: leaving the current room.
//!
//! Idempotent: a session that is not in a room (or whose room is already
//! gone) produces no notifications and no state change. Room deletion is
//! evaluated inside the same registry operation that removes the member.

use std::sync::Arc;

use crate::domain::{
    ClientIp, ConnectionRegistry, LeaveSnapshot, MessagePusher, RoomRegistry, SessionId,
};

/// Removes a session from its current room.
pub struct LeaveRoomUseCase {
    connections: Arc<dyn ConnectionRegistry>,
    rooms: Arc<dyn RoomRegistry>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl LeaveRoomUseCase {
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

    /// Leave the current room, if any.
    ///
    /// # Returns
    ///
    /// The cleanup snapshot (who left, who remains, whether the room was
    /// deleted), or `None` when there was nothing to leave.
    pub async fn execute(&self, ip: &ClientIp, session_id: &SessionId) -> Option<LeaveSnapshot> {
        let session = self.connections.session(ip).await?;
        let code = session.current_room?;

        let snapshot = self.rooms.remove_member(&code, session_id).await;
        self.connections.clear_room(ip).await;

        snapshot
    }

    /// Notify the members left behind.
    pub async fn broadcast_user_left(
        &self,
        targets: Vec<SessionId>,
        message: &str,
    ) -> Result<(), String> {
        self.message_pusher
            .broadcast(targets, message)
            .await
            .map_err(|e| e.to_string())
    }

    /// Tell every connected session that the set of joinable rooms changed.
    pub async fn broadcast_room_list_updated(&self, message: &str) -> Result<(), String> {
        self.message_pusher
            .broadcast_all(message)
            .await
            .map_err(|e| e.to_string())
    }
}
