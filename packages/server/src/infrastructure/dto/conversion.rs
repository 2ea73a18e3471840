//! Conversion logic between domain types and wire DTOs.

use crate::domain::{LeaveSnapshot, Member, RoomSummary, StoredMessage};
use crate::infrastructure::dto::websocket as dto;

// ========================================
// Domain -> DTO
// ========================================

impl From<&Member> for dto::RoomUserPayload {
    fn from(member: &Member) -> Self {
        Self {
            username: member.username.to_string(),
            id: member.session_id.to_string(),
        }
    }
}

impl From<&StoredMessage> for dto::MessagePayload {
    fn from(message: &StoredMessage) -> Self {
        Self {
            id: message.id.clone(),
            text: message.text.clone(),
            username: message.username.clone(),
            timestamp: message.timestamp.clone(),
        }
    }
}

impl From<RoomSummary> for dto::RoomSummaryPayload {
    fn from(summary: RoomSummary) -> Self {
        Self {
            code: summary.code.to_string(),
            name: summary.name,
            user_count: summary.user_count,
            max_users: summary.max_users,
        }
    }
}

impl From<&LeaveSnapshot> for dto::UserLeftPayload {
    fn from(snapshot: &LeaveSnapshot) -> Self {
        Self {
            user_id: snapshot.session_id.to_string(),
            username: snapshot.username.to_string(),
            user_count: snapshot.user_count,
        }
    }
}
