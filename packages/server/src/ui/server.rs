//! Server execution logic.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{Router, routing::get};
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::domain::HostnameResolver;
use crate::usecase::{
    ConnectClientUseCase, CreateRoomUseCase, DisconnectClientUseCase, GetRoomsUseCase,
    JoinRoomUseCase, LeaveRoomUseCase, SendMessageUseCase,
};

use super::{
    handler::{get_open_rooms, health_check, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// Multi-room chat relay server.
///
/// Bundles the use cases and exposes the WebSocket endpoint plus a small
/// HTTP API. Cross-origin access is unrestricted.
pub struct Server {
    connect_client_usecase: Arc<ConnectClientUseCase>,
    disconnect_client_usecase: Arc<DisconnectClientUseCase>,
    create_room_usecase: Arc<CreateRoomUseCase>,
    join_room_usecase: Arc<JoinRoomUseCase>,
    leave_room_usecase: Arc<LeaveRoomUseCase>,
    send_message_usecase: Arc<SendMessageUseCase>,
    get_rooms_usecase: Arc<GetRoomsUseCase>,
    hostname_resolver: Arc<dyn HostnameResolver>,
}

impl Server {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        connect_client_usecase: Arc<ConnectClientUseCase>,
        disconnect_client_usecase: Arc<DisconnectClientUseCase>,
        create_room_usecase: Arc<CreateRoomUseCase>,
        join_room_usecase: Arc<JoinRoomUseCase>,
        leave_room_usecase: Arc<LeaveRoomUseCase>,
        send_message_usecase: Arc<SendMessageUseCase>,
        get_rooms_usecase: Arc<GetRoomsUseCase>,
        hostname_resolver: Arc<dyn HostnameResolver>,
    ) -> Self {
        Self {
            connect_client_usecase,
            disconnect_client_usecase,
            create_room_usecase,
            join_room_usecase,
            leave_room_usecase,
            send_message_usecase,
            get_rooms_usecase,
            hostname_resolver,
        }
    }

    /// Bind `host:port` and serve until shutdown.
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address
    /// or if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let bind_addr = format!("{}:{}", host, port);
        let listener = TcpListener::bind(&bind_addr).await?;

        tracing::info!("Chat relay listening on {}", listener.local_addr()?);
        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        self.serve(listener).await
    }

    /// Serve on an already-bound listener. Integration tests bind port 0 and
    /// call this directly.
    pub async fn serve(self, listener: TcpListener) -> Result<(), Box<dyn std::error::Error>> {
        let app_state = Arc::new(AppState {
            connect_client_usecase: self.connect_client_usecase,
            disconnect_client_usecase: self.disconnect_client_usecase,
            create_room_usecase: self.create_room_usecase,
            join_room_usecase: self.join_room_usecase,
            leave_room_usecase: self.leave_room_usecase,
            send_message_usecase: self.send_message_usecase,
            get_rooms_usecase: self.get_rooms_usecase,
            hostname_resolver: self.hostname_resolver,
        });

        let app = Router::new()
            // WebSocket endpoint
            .route("/ws", get(websocket_handler))
            // HTTP endpoints
            .route("/api/health", get(health_check))
            .route("/api/rooms", get(get_open_rooms))
            .layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            )
            .layer(TraceLayer::new_for_http())
            .with_state(app_state);

        // The peer address feeds the identity rule, so the connect info
        // variant of the service is required here.
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
