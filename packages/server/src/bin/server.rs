//! Multi-room chat relay server.
//!
//! Listens on the port given by the `PORT` environment variable (default
//! 5000). There are no CLI flags and nothing is persisted.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin charla-server
//! PORT=8080 cargo run --bin charla-server
//! ```

use std::sync::Arc;

use charla_server::{
    infrastructure::{
        message_pusher::WebSocketMessagePusher,
        repository::{InMemoryConnectionRegistry, InMemoryRoomRegistry},
        resolver::DnsHostnameResolver,
    },
    ui::Server,
    usecase::{
        ConnectClientUseCase, CreateRoomUseCase, DisconnectClientUseCase, GetRoomsUseCase,
        JoinRoomUseCase, LeaveRoomUseCase, SendMessageUseCase,
    },
};
use charla_shared::logger::setup_logger;

const DEFAULT_PORT: u16 = 5000;

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let port = std::env::var("PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(DEFAULT_PORT);

    // Initialize dependencies in order:
    // 1. Registries
    // 2. MessagePusher
    // 3. Hostname resolver
    // 4. UseCases
    // 5. Server

    // 1. Create the in-memory registries
    let connections = Arc::new(InMemoryConnectionRegistry::new());
    let rooms = Arc::new(InMemoryRoomRegistry::new());

    // 2. Create the MessagePusher (WebSocket implementation)
    let message_pusher = Arc::new(WebSocketMessagePusher::new());

    // 3. Create the best-effort reverse-DNS resolver
    let hostname_resolver = Arc::new(DnsHostnameResolver::from_system_conf());

    // 4. Create the UseCases
    let connect_client_usecase = Arc::new(ConnectClientUseCase::new(
        connections.clone(),
        message_pusher.clone(),
    ));
    let disconnect_client_usecase = Arc::new(DisconnectClientUseCase::new(
        connections.clone(),
        rooms.clone(),
        message_pusher.clone(),
    ));
    let create_room_usecase = Arc::new(CreateRoomUseCase::new(
        rooms.clone(),
        message_pusher.clone(),
    ));
    let join_room_usecase = Arc::new(JoinRoomUseCase::new(
        connections.clone(),
        rooms.clone(),
        message_pusher.clone(),
    ));
    let leave_room_usecase = Arc::new(LeaveRoomUseCase::new(
        connections.clone(),
        rooms.clone(),
        message_pusher.clone(),
    ));
    let send_message_usecase = Arc::new(SendMessageUseCase::new(
        connections.clone(),
        rooms.clone(),
        message_pusher.clone(),
    ));
    let get_rooms_usecase = Arc::new(GetRoomsUseCase::new(rooms.clone(), message_pusher.clone()));

    // 5. Create and run the server
    let server = Server::new(
        connect_client_usecase,
        disconnect_client_usecase,
        create_room_usecase,
        join_room_usecase,
        leave_room_usecase,
        send_message_usecase,
        get_rooms_usecase,
        hostname_resolver,
    );
    if let Err(e) = server.run("0.0.0.0".to_string(), port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
