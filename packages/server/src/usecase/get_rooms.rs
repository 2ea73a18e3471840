//! UseCase: room discovery.

use std::sync::Arc;

use crate::domain::{MessagePusher, RoomRegistry, RoomSummary, SessionId};

/// Produces the open-room listing on demand.
pub struct GetRoomsUseCase {
    rooms: Arc<dyn RoomRegistry>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl GetRoomsUseCase {
    pub fn new(rooms: Arc<dyn RoomRegistry>, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            rooms,
            message_pusher,
        }
    }

    /// Rooms with spare capacity, in registry insertion order. Pure read,
    /// never cached.
    pub async fn execute(&self) -> Vec<RoomSummary> {
        self.rooms.list_open().await
    }

    /// Answer the requesting session only.
    pub async fn push_room_list(
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Member, Username};
    use crate::infrastructure::message_pusher::WebSocketMessagePusher;
    use crate::infrastructure::repository::InMemoryRoomRegistry;

    fn create_usecase() -> (GetRoomsUseCase, Arc<InMemoryRoomRegistry>) {
        let rooms = Arc::new(InMemoryRoomRegistry::new());
        let pusher = Arc::new(WebSocketMessagePusher::new());
        (GetRoomsUseCase::new(rooms.clone(), pusher), rooms)
    }

    #[tokio::test]
    async fn test_listing_is_empty_without_rooms() {
        // Test: no rooms means an empty listing
        // given:
        let (usecase, _rooms) = create_usecase();

        // when:
        let listing = usecase.execute().await;

        // then:
        assert!(listing.is_empty());
    }

    #[tokio::test]
    async fn test_listing_reflects_current_membership() {
        // Test: the listing is recomputed from live registry state
        // given:
        let (usecase, rooms) = create_usecase();
        let code = rooms.create_room("Lobby".to_string(), None).await;
        assert_eq!(usecase.execute().await[0].user_count, 0);

        // when:
        rooms
            .join_if_room_has_space(
                &code,
                Member {
                    session_id: SessionId::new("s1".to_string()),
                    username: Username::new("alice".to_string()),
                },
            )
            .await
            .unwrap();

        // then:
        let listing = usecase.execute().await;
        assert_eq!(listing[0].user_count, 1);
    }

    #[tokio::test]
    async fn test_full_rooms_are_not_listed() {
        // Test: only rooms below capacity are joinable
        // given:
        let (usecase, rooms) = create_usecase();
        let code = rooms.create_room("Tiny".to_string(), Some(1)).await;
        rooms
            .join_if_room_has_space(
                &code,
                Member {
                    session_id: SessionId::new("s1".to_string()),
                    username: Username::new("alice".to_string()),
                },
            )
            .await
            .unwrap();
        rooms.create_room("Open".to_string(), None).await;

        // when:
        let listing = usecase.execute().await;

        // then:
        assert_eq!(listing.len(), 1);
        assert_eq!(listing[0].name, "Open");
    }

    #[tokio::test]
    async fn test_push_room_list_answers_one_session() {
        // Test: the listing goes to the requester only
        // given:
        let rooms = Arc::new(InMemoryRoomRegistry::new());
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let usecase = GetRoomsUseCase::new(rooms, pusher.clone());
        let (tx1, mut rx1) = tokio::sync::mpsc::unbounded_channel();
        let (tx2, mut rx2) = tokio::sync::mpsc::unbounded_channel();
        pusher
            .register_session(SessionId::new("s1".to_string()), tx1)
            .await;
        pusher
            .register_session(SessionId::new("s2".to_string()), tx2)
            .await;

        // when:
        usecase
            .push_room_list(
                &SessionId::new("s1".to_string()),
                r#"{"event":"available_rooms","data":[]}"#,
            )
            .await
            .unwrap();

        // then:
        assert!(rx1.recv().await.unwrap().contains("available_rooms"));
        assert!(rx2.try_recv().is_err());
    }
}
