//! Use-case layer: one use case per inbound operation.
//!
//! Use cases own the atomic registry calls and target selection; the UI
//! layer owns sockets and wire serialization.

mod connect_client;
mod create_room;
mod disconnect_client;
mod error;
mod get_rooms;
mod join_room;
mod leave_room;
mod send_message;

pub use connect_client::ConnectClientUseCase;
pub use create_room::CreateRoomUseCase;
pub use disconnect_client::DisconnectClientUseCase;
pub use error::{ConnectError, JoinRoomError, SendMessageError};
pub use get_rooms::GetRoomsUseCase;
pub use join_room::JoinRoomUseCase;
pub use leave_room::LeaveRoomUseCase;
pub use send_message::SendMessageUseCase;
