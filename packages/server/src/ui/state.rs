//! Shared application state handed to every handler.

use std::sync::Arc;

use crate::domain::HostnameResolver;
use crate::usecase::{
    ConnectClientUseCase, CreateRoomUseCase, DisconnectClientUseCase, GetRoomsUseCase,
    JoinRoomUseCase, LeaveRoomUseCase, SendMessageUseCase,
};

/// Shared application state
pub struct AppState {
    pub connect_client_usecase: Arc<ConnectClientUseCase>,
    pub disconnect_client_usecase: Arc<DisconnectClientUseCase>,
    pub create_room_usecase: Arc<CreateRoomUseCase>,
    pub join_room_usecase: Arc<JoinRoomUseCase>,
    pub leave_room_usecase: Arc<LeaveRoomUseCase>,
    pub send_message_usecase: Arc<SendMessageUseCase>,
    pub get_rooms_usecase: Arc<GetRoomsUseCase>,
    /// Best-effort reverse-DNS enrichment for `host_info`.
    pub hostname_resolver: Arc<dyn HostnameResolver>,
}
