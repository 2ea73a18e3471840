//! In-memory `RoomRegistry` implementation.
//!
//! Rooms live in a mutex-guarded `Vec` so the discovery listing keeps
//! registry insertion order. Every trait method is one lock acquisition,
//! making each event's check-then-mutate atomic relative to other sessions.

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    JoinError, JoinSnapshot, LeaveSnapshot, Member, Room, RoomCode, RoomRegistry, RoomSummary,
    SessionId, StoredMessage,
};

/// In-memory room registry.
#[derive(Default)]
pub struct InMemoryRoomRegistry {
    rooms: Mutex<Vec<Room>>,
}

impl InMemoryRoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn summary(room: &Room) -> RoomSummary {
        RoomSummary {
            code: room.code.clone(),
            name: room.name.clone(),
            user_count: room.member_count(),
            max_users: room.max_users,
        }
    }
}

#[async_trait]
impl RoomRegistry for InMemoryRoomRegistry {
    async fn create_room(&self, name: String, max_users: Option<u32>) -> RoomCode {
        let mut rooms = self.rooms.lock().await;
        // Regenerate on collision so a code is never duplicated among live
        // rooms.
        let code = loop {
            let candidate = RoomCode::generate();
            if !rooms.iter().any(|room| room.code == candidate) {
                break candidate;
            }
        };
        rooms.push(Room::new(code.clone(), name, max_users));
        code
    }

    async fn list_open(&self) -> Vec<RoomSummary> {
        let rooms = self.rooms.lock().await;
        rooms
            .iter()
            .filter(|room| !room.is_full())
            .map(Self::summary)
            .collect()
    }

    async fn join_if_room_has_space(
        &self,
        code: &RoomCode,
        member: Member,
    ) -> Result<JoinSnapshot, JoinError> {
        let mut rooms = self.rooms.lock().await;
        let room = rooms
            .iter_mut()
            .find(|room| &room.code == code)
            .ok_or_else(|| JoinError::RoomNotFound(code.to_string()))?;

        room.add_member(member.clone())?;

        Ok(JoinSnapshot {
            member,
            user_count: room.member_count(),
            members: room.members().to_vec(),
            history: room.history(),
            targets: room.member_session_ids(),
        })
    }

    async fn append_message(
        &self,
        code: &RoomCode,
        message: StoredMessage,
    ) -> Option<Vec<SessionId>> {
        let mut rooms = self.rooms.lock().await;
        let room = rooms.iter_mut().find(|room| &room.code == code)?;
        room.push_message(message);
        Some(room.member_session_ids())
    }

    async fn remove_member(
        &self,
        code: &RoomCode,
        session_id: &SessionId,
    ) -> Option<LeaveSnapshot> {
        let mut rooms = self.rooms.lock().await;
        let index = rooms.iter().position(|room| &room.code == code)?;
        let room = &mut rooms[index];
        let member = room.remove_member(session_id)?;

        let snapshot = LeaveSnapshot {
            room_code: room.code.clone(),
            session_id: member.session_id,
            username: member.username,
            user_count: room.member_count(),
            targets: room.member_session_ids(),
            room_deleted: room.is_empty(),
        };
        // Empty rooms are deleted immediately; they never persist.
        if snapshot.room_deleted {
            rooms.remove(index);
        }
        Some(snapshot)
    }

    async fn room_count(&self) -> usize {
        let rooms = self.rooms.lock().await;
        rooms.len()
    }
}
