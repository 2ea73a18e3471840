//! Ephemeral multi-room chat relay.
//!
//! Clients connect over WebSocket, discover or create named rooms, join one
//! room at a time, and broadcast short text messages to everyone currently
//! in that room. Everything lives in memory; nothing survives a restart.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
