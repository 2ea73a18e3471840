//! UseCase: sending a message to the sender's current room.

use std::sync::Arc;

use charla_shared::time::get_utc_timestamp;

use crate::domain::{
    ClientIp, ConnectionRegistry, MessagePusher, RoomRegistry, SessionId, StoredMessage,
};

use super::error::SendMessageError;

/// Appends a message to the sender's room and selects the fan-out targets.
pub struct SendMessageUseCase {
    connections: Arc<dyn ConnectionRegistry>,
    rooms: Arc<dyn RoomRegistry>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl SendMessageUseCase {
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

    /// Store `text` in the sender's current room.
    ///
    /// # Returns
    ///
    /// * `Ok((message, targets))` - the stored message and every member of
    ///   the room, sender included
    /// * `Err(SendMessageError::NotInRoom)` - the session has no current
    ///   room or the room no longer exists
    pub async fn execute(
        &self,
        ip: &ClientIp,
        text: String,
    ) -> Result<(StoredMessage, Vec<SessionId>), SendMessageError> {
        let session = self
            .connections
            .session(ip)
            .await
            .ok_or(SendMessageError::NotInRoom)?;

        let (code, username) = match (session.current_room, session.username) {
            (Some(code), Some(username)) => (code, username),
            _ => return Err(SendMessageError::NotInRoom),
        };

        let message = StoredMessage::new(text, username.to_string(), get_utc_timestamp());
        let targets = self
            .rooms
            .append_message(&code, message.clone())
            .await
            .ok_or(SendMessageError::NotInRoom)?;

        Ok((message, targets))
    }

    /// Deliver the message to every member of the room, sender included.
    pub async fn broadcast_message(
        &self,
        targets: Vec<SessionId>,
        message: &str,
    ) -> Result<(), String> {
        self.message_pusher
            .broadcast(targets, message)
            .await
            .map_err(|e| e.to_string())
    }

    /// Report a failed send to the sender only.
    pub async fn push_message_error(
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
    use crate::domain::{Member, MessagePushError, MockMessagePusher, Session, Username};
    use crate::infrastructure::message_pusher::WebSocketMessagePusher;
    use crate::infrastructure::repository::{InMemoryConnectionRegistry, InMemoryRoomRegistry};

    async fn seeded_registries() -> (
        Arc<InMemoryConnectionRegistry>,
        Arc<InMemoryRoomRegistry>,
        ClientIp,
        SessionId,
    ) {
        let connections = Arc::new(InMemoryConnectionRegistry::new());
        let rooms = Arc::new(InMemoryRoomRegistry::new());

        let ip = ClientIp::new("192.168.1.20".to_string());
        let session_id = SessionId::new("s1".to_string());
        connections
            .register_if_absent(Session::new(session_id.clone(), ip.clone()))
            .await;

        let code = rooms.create_room("Lobby".to_string(), None).await;
        rooms
            .join_if_room_has_space(
                &code,
                Member {
                    session_id: session_id.clone(),
                    username: Username::new("alice".to_string()),
                },
            )
            .await
            .unwrap();
        connections
            .assign_room(&ip, code, Username::new("alice".to_string()))
            .await;

        (connections, rooms, ip, session_id)
    }

    #[tokio::test]
    async fn test_send_message_stores_and_targets_whole_room() {
        // Test: the message lands in history and targets include the sender
        // given:
        let (connections, rooms, ip, session_id) = seeded_registries().await;
        let usecase = SendMessageUseCase::new(
            connections,
            rooms.clone(),
            Arc::new(WebSocketMessagePusher::new()),
        );

        // when:
        let (message, targets) = usecase
            .execute(&ip, "hola a todos".to_string())
            .await
            .unwrap();

        // then:
        assert_eq!(message.text, "hola a todos");
        assert_eq!(message.username, "alice");
        assert!(!message.id.is_empty());
        assert!(message.timestamp.ends_with('Z'));
        assert_eq!(targets, vec![session_id]);
    }

    #[tokio::test]
    async fn test_send_message_without_room_fails() {
        // Test: a session outside any room gets NotInRoom
        // given:
        let connections = Arc::new(InMemoryConnectionRegistry::new());
        let rooms = Arc::new(InMemoryRoomRegistry::new());
        let ip = ClientIp::new("192.168.1.20".to_string());
        connections
            .register_if_absent(Session::new(SessionId::new("s1".to_string()), ip.clone()))
            .await;
        let usecase =
            SendMessageUseCase::new(connections, rooms, Arc::new(WebSocketMessagePusher::new()));

        // when:
        let result = usecase.execute(&ip, "hola".to_string()).await;

        // then:
        assert_eq!(result.unwrap_err(), SendMessageError::NotInRoom);
    }

    #[tokio::test]
    async fn test_send_message_from_unknown_session_fails() {
        // Test: an unregistered identity cannot send
        // given:
        let usecase = SendMessageUseCase::new(
            Arc::new(InMemoryConnectionRegistry::new()),
            Arc::new(InMemoryRoomRegistry::new()),
            Arc::new(WebSocketMessagePusher::new()),
        );

        // when:
        let result = usecase
            .execute(&ClientIp::new("203.0.113.9".to_string()), "hola".to_string())
            .await;

        // then:
        assert_eq!(result.unwrap_err(), SendMessageError::NotInRoom);
    }

    #[tokio::test]
    async fn test_broadcast_message_pushes_to_targets() {
        // Test: fan-out goes through the pusher exactly once
        // given:
        let (connections, rooms, _ip, session_id) = seeded_registries().await;
        let mut pusher = MockMessagePusher::new();
        let expected = vec![session_id.clone()];
        pusher
            .expect_broadcast()
            .withf(move |targets, content| {
                targets == &expected && content.contains("receive_message")
            })
            .times(1)
            .returning(|_, _| Ok(()));
        let usecase = SendMessageUseCase::new(connections, rooms, Arc::new(pusher));

        // when:
        let result = usecase
            .broadcast_message(vec![session_id], r#"{"event":"receive_message","data":{}}"#)
            .await;

        // then:
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_broadcast_failure_is_reported() {
        // Test: a pusher failure surfaces as an error string
        // given:
        let (connections, rooms, _ip, session_id) = seeded_registries().await;
        let mut pusher = MockMessagePusher::new();
        pusher
            .expect_broadcast()
            .times(1)
            .returning(|_, _| Err(MessagePushError::PushFailed("channel closed".to_string())));
        let usecase = SendMessageUseCase::new(connections, rooms, Arc::new(pusher));

        // when:
        let result = usecase.broadcast_message(vec![session_id], "{}").await;

        // then:
        assert!(result.unwrap_err().contains("channel closed"));
    }
}
