//! UseCase: room creation.

use std::sync::Arc;

use crate::domain::{MessagePusher, RoomCode, RoomRegistry, SessionId};

/// Creates rooms and announces the changed listing.
pub struct CreateRoomUseCase {
    rooms: Arc<dyn RoomRegistry>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl CreateRoomUseCase {
    pub fn new(rooms: Arc<dyn RoomRegistry>, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            rooms,
            message_pusher,
        }
    }

    /// Insert an empty room. Always succeeds; names are not deduplicated and
    /// a `max_users` of `None` or zero falls back to the default capacity.
    pub async fn execute(&self, name: String, max_users: Option<u32>) -> RoomCode {
        self.rooms.create_room(name, max_users).await
    }

    /// Answer the creator with the generated code.
    pub async fn push_room_created(
        &self,
        session_id: &SessionId,
        message: &str,
    ) -> Result<(), String> {
        self.message_pusher
            .push_to(session_id, message)
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
