//! Wire DTOs for the WebSocket protocol.
//!
//! Every frame is a JSON envelope `{"event": <name>, "data": <payload>}`;
//! payload keys are camelCase. Inbound frames are parsed in two steps
//! (envelope, then per-event payload) so a malformed payload is rejected
//! without touching any state.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Names of every event crossing the wire, in either direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    // client -> server
    CreateRoom,
    JoinRoom,
    SendMessage,
    LeaveRoom,
    GetRooms,
    // server -> client
    HostInfo,
    ConnectionRejected,
    AvailableRooms,
    RoomCreated,
    RoomListUpdated,
    JoinRoomError,
    UserJoined,
    RoomHistory,
    MessageError,
    ReceiveMessage,
    UserLeft,
}

/// The `{event, data}` envelope carried by every frame.
#[derive(Debug, Serialize, Deserialize)]
pub struct Envelope {
    pub event: EventKind,
    #[serde(default)]
    pub data: Value,
}

impl Envelope {
    pub fn new(event: EventKind, data: impl Serialize) -> Self {
        let data = serde_json::to_value(data).unwrap_or(Value::Null);
        Self { event, data }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

// ---------------------------------------------------------------------------
// Inbound payloads (client -> server)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomPayload {
    pub room_name: String,
    #[serde(default)]
    pub max_users: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRoomPayload {
    pub room_code: String,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessagePayload {
    pub text: String,
}

/// A fully parsed inbound event.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    CreateRoom(CreateRoomPayload),
    JoinRoom(JoinRoomPayload),
    SendMessage(SendMessagePayload),
    LeaveRoom,
    GetRooms,
}

#[derive(Debug, Error)]
pub enum EventParseError {
    #[error("malformed event: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("event '{0:?}' is not a client event")]
    UnexpectedEvent(EventKind),
}

impl ClientEvent {
    /// Parse one inbound text frame.
    pub fn parse(text: &str) -> Result<Self, EventParseError> {
        let envelope: Envelope = serde_json::from_str(text)?;
        match envelope.event {
            EventKind::CreateRoom => Ok(Self::CreateRoom(serde_json::from_value(envelope.data)?)),
            EventKind::JoinRoom => Ok(Self::JoinRoom(serde_json::from_value(envelope.data)?)),
            EventKind::SendMessage => Ok(Self::SendMessage(serde_json::from_value(envelope.data)?)),
            EventKind::LeaveRoom => Ok(Self::LeaveRoom),
            EventKind::GetRooms => Ok(Self::GetRooms),
            other => Err(EventParseError::UnexpectedEvent(other)),
        }
    }
}

// ---------------------------------------------------------------------------
// Outbound payloads (server -> client)
// ---------------------------------------------------------------------------

/// Shared `{message}` payload for `connection_rejected`, `join_room_error`,
/// and `message_error`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HostInfoPayload {
    pub ip: String,
    pub host: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummaryPayload {
    pub code: String,
    pub name: String,
    pub user_count: usize,
    pub max_users: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomCreatedPayload {
    pub room_code: String,
}

/// One member as seen by clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoomUserPayload {
    pub username: String,
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserJoinedPayload {
    pub user: RoomUserPayload,
    pub user_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessagePayload {
    pub id: String,
    pub text: String,
    pub username: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoomHistoryPayload {
    pub messages: Vec<MessagePayload>,
    pub users: Vec<RoomUserPayload>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserLeftPayload {
    pub user_id: String,
    pub username: String,
    pub user_count: usize,
}
