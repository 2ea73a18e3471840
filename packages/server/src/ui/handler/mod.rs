//! Request handlers for the WebSocket endpoint and the HTTP API.

mod http;
mod websocket;

pub use http::{get_open_rooms, health_check};
pub use websocket::websocket_handler;
