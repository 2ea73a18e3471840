//! Use-case error types.
//!
//! Each error maps to exactly one named error event on the wire; the
//! user-facing strings are produced by `client_message()` and log lines stay
//! English.

use thiserror::Error;

use crate::domain::JoinError;

/// Connection acceptance failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConnectError {
    /// The identity already has an active session; the new connection is
    /// rejected and terminated, the existing one is untouched.
    #[error("identity '{0}' already has an active session")]
    DuplicateIdentity(String),
}

impl ConnectError {
    pub fn client_message(&self) -> &'static str {
        match self {
            Self::DuplicateIdentity(_) => "Ya estás conectado desde otro navegador.",
        }
    }
}

/// Join failures, reported to the caller only; no state is mutated.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum JoinRoomError {
    #[error("room '{0}' does not exist")]
    RoomNotFound(String),
    #[error("room '{0}' is full")]
    RoomFull(String),
}

impl JoinRoomError {
    pub fn client_message(&self) -> &'static str {
        match self {
            Self::RoomNotFound(_) => "La sala no existe.",
            Self::RoomFull(_) => "La sala está llena.",
        }
    }
}

impl From<JoinError> for JoinRoomError {
    fn from(err: JoinError) -> Self {
        match err {
            JoinError::RoomNotFound(code) => Self::RoomNotFound(code),
            JoinError::RoomFull(code) => Self::RoomFull(code),
        }
    }
}

/// Message submission failures, reported to the sender only.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SendMessageError {
    /// The session has no current room, or its room no longer exists.
    #[error("session is not in a room")]
    NotInRoom,
}

impl SendMessageError {
    pub fn client_message(&self) -> &'static str {
        match self {
            Self::NotInRoom => "No estás en una sala válida.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_messages_are_the_published_strings() {
        // Test: wire-facing strings match the protocol verbatim
        // given:
        let duplicate = ConnectError::DuplicateIdentity("192.168.1.20".to_string());
        let not_found = JoinRoomError::RoomNotFound("FFFFFF".to_string());
        let full = JoinRoomError::RoomFull("FFFFFF".to_string());
        let not_in_room = SendMessageError::NotInRoom;

        // when / then:
        assert_eq!(
            duplicate.client_message(),
            "Ya estás conectado desde otro navegador."
        );
        assert_eq!(not_found.client_message(), "La sala no existe.");
        assert_eq!(full.client_message(), "La sala está llena.");
        assert_eq!(not_in_room.client_message(), "No estás en una sala válida.");
    }

    #[test]
    fn test_domain_join_error_maps_variant_for_variant() {
        // Test: registry-level join errors convert without losing the code
        // given:
        let not_found = JoinError::RoomNotFound("A1B2C3".to_string());
        let full = JoinError::RoomFull("A1B2C3".to_string());

        // when:
        let mapped_not_found: JoinRoomError = not_found.into();
        let mapped_full: JoinRoomError = full.into();

        // then:
        assert_eq!(
            mapped_not_found,
            JoinRoomError::RoomNotFound("A1B2C3".to_string())
        );
        assert_eq!(mapped_full, JoinRoomError::RoomFull("A1B2C3".to_string()));
    }
}
