//! Registry ports for the two pieces of shared mutable state.
//!
//! Every check-then-mutate sequence is a single trait method so that an
//! implementation can make it atomic under one lock acquisition. Use cases
//! depend on these traits; the in-memory implementations live in the
//! infrastructure layer.

use async_trait::async_trait;
use thiserror::Error;

use super::entity::{Member, Session, StoredMessage};
use super::value_object::{ClientIp, RoomCode, SessionId, Username};

/// Room-level join failures. No state is mutated when these are returned.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum JoinError {
    #[error("room '{0}' does not exist")]
    RoomNotFound(String),
    #[error("room '{0}' is full")]
    RoomFull(String),
}

/// Discovery-listing entry for one open room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomSummary {
    pub code: RoomCode,
    pub name: String,
    pub user_count: usize,
    pub max_users: u32,
}

/// Atomic result of a successful join: everything the coordinator needs to
/// notify the room and answer the joiner.
#[derive(Debug, Clone)]
pub struct JoinSnapshot {
    /// The membership entry that was inserted.
    pub member: Member,
    /// Member count after the join.
    pub user_count: usize,
    /// Full member list in join order, joiner included.
    pub members: Vec<Member>,
    /// Message history snapshot, oldest first.
    pub history: Vec<StoredMessage>,
    /// Broadcast targets: every member of the room, joiner included.
    pub targets: Vec<SessionId>,
}

/// Atomic result of a membership-decreasing operation (leave or disconnect
/// cleanup).
#[derive(Debug, Clone)]
pub struct LeaveSnapshot {
    pub room_code: RoomCode,
    pub session_id: SessionId,
    pub username: Username,
    /// Member count after the removal.
    pub user_count: usize,
    /// Broadcast targets: the members left behind.
    pub targets: Vec<SessionId>,
    /// True when the removal emptied the room and it was deleted.
    pub room_deleted: bool,
}

/// Registry of live rooms.
#[async_trait]
pub trait RoomRegistry: Send + Sync {
    /// Insert an empty room under a freshly generated unique code.
    /// `max_users` of `None` or zero falls back to the default capacity.
    async fn create_room(&self, name: String, max_users: Option<u32>) -> RoomCode;

    /// Rooms with spare capacity, in registry insertion order.
    async fn list_open(&self) -> Vec<RoomSummary>;

    /// Insert `member` into the room unless it is absent or full.
    async fn join_if_room_has_space(
        &self,
        code: &RoomCode,
        member: Member,
    ) -> Result<JoinSnapshot, JoinError>;

    /// Append a message to the room's history and return the broadcast
    /// targets (all members). `None` when the room no longer exists.
    async fn append_message(
        &self,
        code: &RoomCode,
        message: StoredMessage,
    ) -> Option<Vec<SessionId>>;

    /// Remove a member, deleting the room if it becomes empty. `None` when
    /// the session is not a member or the room is gone (idempotent no-op).
    async fn remove_member(
        &self,
        code: &RoomCode,
        session_id: &SessionId,
    ) -> Option<LeaveSnapshot>;

    /// Number of live rooms.
    async fn room_count(&self) -> usize;
}

/// Registry mapping a network identity to its single active session.
#[async_trait]
pub trait ConnectionRegistry: Send + Sync {
    /// Register `session` under its identity. Returns `false` (and leaves
    /// the registry untouched) when the identity already has a session.
    async fn register_if_absent(&self, session: Session) -> bool;

    /// Remove the mapping only when the stored session id matches, so a
    /// stale removal never evicts a newer session. Returns the removed
    /// session.
    async fn unregister(&self, ip: &ClientIp, session_id: &SessionId) -> Option<Session>;

    /// Point the identity's session at a room.
    async fn assign_room(&self, ip: &ClientIp, code: RoomCode, username: Username);

    /// Clear the identity's session room pointer and username.
    async fn clear_room(&self, ip: &ClientIp);

    /// Snapshot of the identity's session, if any.
    async fn session(&self, ip: &ClientIp) -> Option<Session>;

    /// Number of registered sessions.
    async fn connection_count(&self) -> usize;
}
