//! UseCase: joining a room.
//!
//! The membership insert is one atomic registry operation; a failed join
//! mutates nothing and the session keeps its prior state. A session joining
//! a second room implicitly leaves its previous one, keeping the
//! at-most-one-room invariant.

use std::sync::Arc;

use crate::domain::{
    ClientIp, ConnectionRegistry, JoinSnapshot, LeaveSnapshot, Member, MessagePusher, RoomCode,
    RoomRegistry, SessionId, Username,
};

use super::error::JoinRoomError;

/// Moves a session into a room.
pub struct JoinRoomUseCase {
    connections: Arc<dyn ConnectionRegistry>,
    rooms: Arc<dyn RoomRegistry>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl JoinRoomUseCase {
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

    /// Join `code` under `username`.
    ///
    /// # Returns
    ///
    /// * `Ok((join, left))` - the join snapshot plus, when the session was
    ///   in a different room before, the cleanup snapshot of that room
    /// * `Err(JoinRoomError)` - the room is absent or full; no state changed
    pub async fn execute(
        &self,
        ip: &ClientIp,
        session_id: &SessionId,
        code: RoomCode,
        username: Username,
    ) -> Result<(JoinSnapshot, Option<LeaveSnapshot>), JoinRoomError> {
        let prior_room = self
            .connections
            .session(ip)
            .await
            .and_then(|session| session.current_room);

        let member = Member {
            session_id: session_id.clone(),
            username: username.clone(),
        };
        let snapshot = self.rooms.join_if_room_has_space(&code, member).await?;

        // Membership in the previous room ends once the new join has
        // succeeded; a failed join leaves it untouched.
        let left = match prior_room {
            Some(prev) if prev != code => self.rooms.remove_member(&prev, session_id).await,
            _ => None,
        };

        self.connections.assign_room(ip, code, username).await;

        Ok((snapshot, left))
    }

    /// Announce the new member to the whole room, joiner included.
    pub async fn broadcast_user_joined(
        &self,
        targets: Vec<SessionId>,
        message: &str,
    ) -> Result<(), String> {
        self.message_pusher
            .broadcast(targets, message)
            .await
            .map_err(|e| e.to_string())
    }

    /// Hand the joiner the room history and member list.
    pub async fn push_room_history(
        &self,
        session_id: &SessionId,
        message: &str,
    ) -> Result<(), String> {
        self.message_pusher
            .push_to(session_id, message)
            .await
            .map_err(|e| e.to_string())
    }

    /// Report a failed join to the caller only.
    pub async fn push_join_error(
        &self,
        session_id: &SessionId,
        message: &str,
    ) -> Result<(), String> {
        self.message_pusher
            .push_to(session_id, message)
            .await
            .map_err(|e| e.to_string())
    }
}
