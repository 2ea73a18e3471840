//! Entities for the chat relay domain: sessions, rooms, members, and
//! messages.

use std::collections::VecDeque;

use charla_shared::time::millis_to_rfc3339;

use super::registry::JoinError;
use super::value_object::{ClientIp, RoomCode, SessionId, Username};

/// Default room capacity when a creator supplies none (or zero).
pub const DEFAULT_MAX_USERS: u32 = 10;

/// Upper bound on retained messages per room; the oldest entry is evicted
/// first.
pub const MESSAGE_HISTORY_CAPACITY: usize = 100;

/// One live connection.
///
/// Username and current room are set together on join and cleared together
/// on leave; a session is in at most one room at any time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: SessionId,
    pub ip: ClientIp,
    pub username: Option<Username>,
    pub current_room: Option<RoomCode>,
}

impl Session {
    pub fn new(id: SessionId, ip: ClientIp) -> Self {
        Self {
            id,
            ip,
            username: None,
            current_room: None,
        }
    }

    /// Record that the session joined `code` under `username`.
    pub fn enter_room(&mut self, code: RoomCode, username: Username) {
        self.current_room = Some(code);
        self.username = Some(username);
    }

    /// Clear the room pointer and the display name set at join time.
    pub fn leave_room(&mut self) {
        self.current_room = None;
        self.username = None;
    }
}

/// One room membership entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub session_id: SessionId,
    pub username: Username,
}

/// A chat message retained in a room's history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredMessage {
    /// Time-derived id, unique enough for display ordering.
    pub id: String,
    pub text: String,
    pub username: String,
    /// RFC 3339 UTC creation time.
    pub timestamp: String,
}

impl StoredMessage {
    pub fn new(text: String, username: String, unix_millis: i64) -> Self {
        Self {
            id: unix_millis.to_string(),
            text,
            username,
            timestamp: millis_to_rfc3339(unix_millis),
        }
    }
}

/// A named, capacity-bounded broadcast group with bounded message history.
#[derive(Debug, Clone)]
pub struct Room {
    pub code: RoomCode,
    pub name: String,
    pub max_users: u32,
    members: Vec<Member>,
    messages: VecDeque<StoredMessage>,
    history_capacity: usize,
}

impl Room {
    /// Create an empty room. `max_users` of `None` or zero falls back to
    /// [`DEFAULT_MAX_USERS`].
    pub fn new(code: RoomCode, name: String, max_users: Option<u32>) -> Self {
        Self::with_history_capacity(code, name, max_users, MESSAGE_HISTORY_CAPACITY)
    }

    /// Create a room with an explicit history bound. Used by tests to
    /// exercise eviction without appending hundreds of messages.
    pub fn with_history_capacity(
        code: RoomCode,
        name: String,
        max_users: Option<u32>,
        history_capacity: usize,
    ) -> Self {
        let max_users = max_users.filter(|&n| n > 0).unwrap_or(DEFAULT_MAX_USERS);
        Self {
            code,
            name,
            max_users,
            members: Vec::new(),
            messages: VecDeque::new(),
            history_capacity,
        }
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn is_full(&self) -> bool {
        self.members.len() as u32 >= self.max_users
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Insert a member, replacing an existing entry for the same session.
    /// A room at capacity rejects every join, re-joins included.
    pub fn add_member(&mut self, member: Member) -> Result<(), JoinError> {
        if self.is_full() {
            return Err(JoinError::RoomFull(self.code.to_string()));
        }
        if let Some(existing) = self
            .members
            .iter_mut()
            .find(|m| m.session_id == member.session_id)
        {
            *existing = member;
            return Ok(());
        }
        self.members.push(member);
        Ok(())
    }

    /// Remove a member; `None` if the session was not a member.
    pub fn remove_member(&mut self, session_id: &SessionId) -> Option<Member> {
        let index = self
            .members
            .iter()
            .position(|m| &m.session_id == session_id)?;
        Some(self.members.remove(index))
    }

    /// Append a message, evicting the oldest entry once the history bound
    /// is reached.
    pub fn push_message(&mut self, message: StoredMessage) {
        if self.messages.len() >= self.history_capacity {
            self.messages.pop_front();
        }
        self.messages.push_back(message);
    }

    /// Members in join order.
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn member_session_ids(&self) -> Vec<SessionId> {
        self.members.iter().map(|m| m.session_id.clone()).collect()
    }

    /// History snapshot, oldest first.
    pub fn history(&self) -> Vec<StoredMessage> {
        self.messages.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(session: &str, name: &str) -> Member {
        Member {
            session_id: SessionId::new(session.to_string()),
            username: Username::new(name.to_string()),
        }
    }

    fn message(id: &str) -> StoredMessage {
        StoredMessage {
            id: id.to_string(),
            text: format!("text-{id}"),
            username: "alice".to_string(),
            timestamp: "2023-01-01T00:00:00.000Z".to_string(),
        }
    }

    #[test]
    fn test_room_capacity_defaults_to_ten() {
        // Test: absent and zero capacities both fall back to the default
        // given:

        // when:
        let unspecified = Room::new(RoomCode::generate(), "Lobby".to_string(), None);
        let zero = Room::new(RoomCode::generate(), "Lobby".to_string(), Some(0));
        let explicit = Room::new(RoomCode::generate(), "Lobby".to_string(), Some(3));

        // then:
        assert_eq!(unspecified.max_users, DEFAULT_MAX_USERS);
        assert_eq!(zero.max_users, DEFAULT_MAX_USERS);
        assert_eq!(explicit.max_users, 3);
    }

    #[test]
    fn test_add_member_rejects_when_full() {
        // Test: a full room rejects new members and stays unchanged
        // given:
        let mut room = Room::new(RoomCode::generate(), "Lobby".to_string(), Some(1));
        room.add_member(member("s1", "alice")).unwrap();

        // when:
        let result = room.add_member(member("s2", "bob"));

        // then:
        assert!(matches!(result, Err(JoinError::RoomFull(_))));
        assert_eq!(room.member_count(), 1);
        assert!(room.is_full());
    }

    #[test]
    fn test_add_member_replaces_existing_session() {
        // Test: re-joining the same session replaces the entry, not adds one
        // given:
        let mut room = Room::new(RoomCode::generate(), "Lobby".to_string(), Some(5));
        room.add_member(member("s1", "alice")).unwrap();

        // when:
        room.add_member(member("s1", "alicia")).unwrap();

        // then:
        assert_eq!(room.member_count(), 1);
        assert_eq!(room.members()[0].username.as_str(), "alicia");
    }

    #[test]
    fn test_remove_member_is_idempotent() {
        // Test: removing an absent member is a no-op returning None
        // given:
        let mut room = Room::new(RoomCode::generate(), "Lobby".to_string(), None);
        room.add_member(member("s1", "alice")).unwrap();

        // when:
        let removed = room.remove_member(&SessionId::new("s1".to_string()));
        let removed_again = room.remove_member(&SessionId::new("s1".to_string()));

        // then:
        assert_eq!(removed.unwrap().username.as_str(), "alice");
        assert!(removed_again.is_none());
        assert!(room.is_empty());
    }

    #[test]
    fn test_members_keep_join_order() {
        // Test: the member list preserves join order
        // given:
        let mut room = Room::new(RoomCode::generate(), "Lobby".to_string(), None);

        // when:
        room.add_member(member("s1", "alice")).unwrap();
        room.add_member(member("s2", "bob")).unwrap();
        room.add_member(member("s3", "carol")).unwrap();

        // then:
        let names: Vec<&str> = room.members().iter().map(|m| m.username.as_str()).collect();
        assert_eq!(names, vec!["alice", "bob", "carol"]);
    }

    #[test]
    fn test_history_evicts_oldest_past_capacity() {
        // Test: appending past the bound drops the oldest entry and keeps order
        // given:
        let mut room = Room::with_history_capacity(
            RoomCode::generate(),
            "Lobby".to_string(),
            None,
            3,
        );
        for id in ["1", "2", "3"] {
            room.push_message(message(id));
        }

        // when:
        room.push_message(message("4"));

        // then:
        let history = room.history();
        assert_eq!(history.len(), 3);
        let ids: Vec<&str> = history.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "3", "4"]);
    }

    #[test]
    fn test_full_history_bound_is_one_hundred() {
        // Test: the 101st message evicts exactly the first one
        // given:
        let mut room = Room::new(RoomCode::generate(), "Lobby".to_string(), None);
        for i in 0..MESSAGE_HISTORY_CAPACITY {
            room.push_message(message(&i.to_string()));
        }

        // when:
        room.push_message(message("extra"));

        // then:
        let history = room.history();
        assert_eq!(history.len(), MESSAGE_HISTORY_CAPACITY);
        assert_eq!(history[0].id, "1");
        assert_eq!(history.last().unwrap().id, "extra");
    }

    #[test]
    fn test_stored_message_derives_id_and_timestamp_from_millis() {
        // Test: id and timestamp come from the same instant
        // given:
        let millis = 1672531200123;

        // when:
        let msg = StoredMessage::new("hola".to_string(), "alice".to_string(), millis);

        // then:
        assert_eq!(msg.id, "1672531200123");
        assert_eq!(msg.timestamp, "2023-01-01T00:00:00.123Z");
        assert_eq!(msg.text, "hola");
        assert_eq!(msg.username, "alice");
    }

    #[test]
    fn test_session_room_lifecycle() {
        // Test: join sets room and username together; leave clears both
        // given:
        let mut session = Session::new(
            SessionId::generate(),
            ClientIp::new("192.168.1.20".to_string()),
        );
        assert!(session.current_room.is_none());

        // when:
        session.enter_room(
            RoomCode::new("A1B2C3".to_string()),
            Username::new("alice".to_string()),
        );

        // then:
        assert_eq!(
            session.current_room.as_ref().map(|c| c.as_str()),
            Some("A1B2C3")
        );
        assert_eq!(session.username.as_ref().map(|u| u.as_str()), Some("alice"));

        // when:
        session.leave_room();

        // then:
        assert!(session.current_room.is_none());
        assert!(session.username.is_none());
    }
}
