//! WebSocket connection handler: the per-session coordinator.
//!
//! One task reads inbound frames and dispatches them to the use cases in
//! arrival order; a second task drains the session's outbound channel into
//! the socket. Disconnect cleanup runs after either task ends.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{
        ConnectInfo, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::HeaderMap,
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::{
    domain::{ClientIp, LeaveSnapshot, PusherChannel, RoomCode, Session, SessionId, Username},
    infrastructure::dto::websocket::{
        ClientEvent, CreateRoomPayload, Envelope, ErrorPayload, EventKind, HostInfoPayload,
        JoinRoomPayload, MessagePayload, RoomCreatedPayload, RoomHistoryPayload,
        RoomSummaryPayload, RoomUserPayload, SendMessagePayload, UserJoinedPayload,
        UserLeftPayload,
    },
    ui::state::AppState,
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    let ip = ClientIp::from_parts(forwarded.as_deref(), &peer.ip().to_string());

    ws.on_upgrade(move |socket| handle_socket(socket, state, ip))
}

/// Spawns the task draining the session's outbound channel into the socket.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

/// Fire-and-forget reverse hostname lookup. The result rides the session's
/// outbound channel; a session that is already gone simply misses it.
fn spawn_host_info_lookup(state: Arc<AppState>, ip: ClientIp, tx: PusherChannel) {
    tokio::spawn(async move {
        let host = state
            .hostname_resolver
            .reverse_lookup(ip.as_str())
            .await
            .unwrap_or_else(|| ip.as_str().to_string());
        tracing::debug!("Client '{}' resolved to host '{}'", ip, host);

        let payload = HostInfoPayload {
            ip: ip.to_string(),
            host,
        };
        let _ = tx.send(Envelope::new(EventKind::HostInfo, payload).to_json());
    });
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, ip: ClientIp) {
    let (mut sender, mut receiver) = socket.split();
    let session_id = SessionId::generate();
    let (tx, rx) = mpsc::unbounded_channel();

    // Best-effort enrichment; never gates or delays acceptance.
    spawn_host_info_lookup(state.clone(), ip.clone(), tx.clone());

    // Claim the identity. A duplicate gets one rejection event and is gone.
    let session = Session::new(session_id.clone(), ip.clone());
    if let Err(e) = state.connect_client_usecase.execute(session, tx).await {
        tracing::warn!("Connection from '{}' rejected: {}", ip, e);
        let rejected = Envelope::new(
            EventKind::ConnectionRejected,
            ErrorPayload {
                message: e.client_message().to_string(),
            },
        )
        .to_json();
        let _ = sender.send(Message::Text(rejected.into())).await;
        let _ = sender.close().await;
        return;
    }
    tracing::info!("Client '{}' connected as session '{}'", ip, session_id);

    // Send the current open-room listing to the new session.
    let listing: Vec<RoomSummaryPayload> = state
        .get_rooms_usecase
        .execute()
        .await
        .into_iter()
        .map(Into::into)
        .collect();
    let listing_json = Envelope::new(EventKind::AvailableRooms, listing).to_json();
    if sender.send(Message::Text(listing_json.into())).await.is_err() {
        tracing::warn!("Session '{}' dropped before the room listing", session_id);
        let _ = state.disconnect_client_usecase.execute(&ip, &session_id).await;
        return;
    }

    let recv_state = state.clone();
    let recv_ip = ip.clone();
    let recv_session_id = session_id.clone();

    // Inbound events are handled to completion in arrival order.
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::error!("WebSocket error: {}", e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    dispatch_event(&recv_state, &recv_ip, &recv_session_id, &text).await;
                }
                Message::Close(_) => {
                    tracing::info!("Session '{}' requested close", recv_session_id);
                    break;
                }
                Message::Ping(_) => {
                    tracing::debug!("Received ping");
                }
                _ => {}
            }
        }
    });

    let mut send_task = pusher_loop(rx, sender);

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    // Disconnect cleanup: guarded unregister plus implicit leave.
    if let Some(left) = state.disconnect_client_usecase.execute(&ip, &session_id).await {
        notify_user_left(&state, &left).await;
    }
    tracing::info!("Session '{}' ({}) disconnected", session_id, ip);
}

async fn dispatch_event(state: &Arc<AppState>, ip: &ClientIp, session_id: &SessionId, text: &str) {
    let event = match ClientEvent::parse(text) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!("Ignoring malformed event from '{}': {}", ip, e);
            return;
        }
    };

    match event {
        ClientEvent::CreateRoom(payload) => handle_create_room(state, session_id, payload).await,
        ClientEvent::JoinRoom(payload) => handle_join_room(state, ip, session_id, payload).await,
        ClientEvent::SendMessage(payload) => {
            handle_send_message(state, ip, session_id, payload).await;
        }
        ClientEvent::LeaveRoom => handle_leave_room(state, ip, session_id).await,
        ClientEvent::GetRooms => handle_get_rooms(state, session_id).await,
    }
}

async fn handle_create_room(
    state: &Arc<AppState>,
    session_id: &SessionId,
    payload: CreateRoomPayload,
) {
    let code = state
        .create_room_usecase
        .execute(payload.room_name.clone(), payload.max_users)
        .await;
    tracing::info!("Room '{}' created with code {}", payload.room_name, code);

    let created = Envelope::new(
        EventKind::RoomCreated,
        RoomCreatedPayload {
            room_code: code.to_string(),
        },
    )
    .to_json();
    if let Err(e) = state
        .create_room_usecase
        .push_room_created(session_id, &created)
        .await
    {
        tracing::warn!("Failed to answer room creator '{}': {}", session_id, e);
    }

    let update = Envelope::new(EventKind::RoomListUpdated, serde_json::json!({})).to_json();
    if let Err(e) = state
        .create_room_usecase
        .broadcast_room_list_updated(&update)
        .await
    {
        tracing::warn!("Failed to broadcast room_list_updated: {}", e);
    }
}

async fn handle_join_room(
    state: &Arc<AppState>,
    ip: &ClientIp,
    session_id: &SessionId,
    payload: JoinRoomPayload,
) {
    let code = RoomCode::new(payload.room_code);
    let username = Username::new(payload.username);

    match state
        .join_room_usecase
        .execute(ip, session_id, code.clone(), username)
        .await
    {
        Ok((join, left)) => {
            // The previous room (if any) hears about the departure first.
            if let Some(left) = left {
                notify_user_left(state, &left).await;
            }

            let joined = Envelope::new(
                EventKind::UserJoined,
                UserJoinedPayload {
                    user: (&join.member).into(),
                    user_count: join.user_count,
                },
            )
            .to_json();
            if let Err(e) = state
                .join_room_usecase
                .broadcast_user_joined(join.targets.clone(), &joined)
                .await
            {
                tracing::warn!("Failed to broadcast user_joined in room {}: {}", code, e);
            }

            let history = Envelope::new(
                EventKind::RoomHistory,
                RoomHistoryPayload {
                    messages: join.history.iter().map(MessagePayload::from).collect(),
                    users: join.members.iter().map(RoomUserPayload::from).collect(),
                },
            )
            .to_json();
            if let Err(e) = state
                .join_room_usecase
                .push_room_history(session_id, &history)
                .await
            {
                tracing::warn!("Failed to send room history to '{}': {}", session_id, e);
            }

            tracing::info!(
                "User '{}' joined room {} ({} members)",
                join.member.username,
                code,
                join.user_count
            );
        }
        Err(e) => {
            tracing::warn!("Session '{}' failed to join room {}: {}", session_id, code, e);
            let error = Envelope::new(
                EventKind::JoinRoomError,
                ErrorPayload {
                    message: e.client_message().to_string(),
                },
            )
            .to_json();
            if let Err(push_err) = state
                .join_room_usecase
                .push_join_error(session_id, &error)
                .await
            {
                tracing::warn!("Failed to report join error to '{}': {}", session_id, push_err);
            }
        }
    }
}

async fn handle_send_message(
    state: &Arc<AppState>,
    ip: &ClientIp,
    session_id: &SessionId,
    payload: SendMessagePayload,
) {
    match state.send_message_usecase.execute(ip, payload.text).await {
        Ok((message, targets)) => {
            tracing::info!(
                "Message from '{}' fanned out to {} member(s)",
                message.username,
                targets.len()
            );
            let frame =
                Envelope::new(EventKind::ReceiveMessage, MessagePayload::from(&message)).to_json();
            if let Err(e) = state
                .send_message_usecase
                .broadcast_message(targets, &frame)
                .await
            {
                tracing::warn!("Failed to broadcast message from '{}': {}", session_id, e);
            }
        }
        Err(e) => {
            tracing::warn!("Session '{}' cannot send: {}", session_id, e);
            let error = Envelope::new(
                EventKind::MessageError,
                ErrorPayload {
                    message: e.client_message().to_string(),
                },
            )
            .to_json();
            if let Err(push_err) = state
                .send_message_usecase
                .push_message_error(session_id, &error)
                .await
            {
                tracing::warn!(
                    "Failed to report message error to '{}': {}",
                    session_id,
                    push_err
                );
            }
        }
    }
}

async fn handle_leave_room(state: &Arc<AppState>, ip: &ClientIp, session_id: &SessionId) {
    match state.leave_room_usecase.execute(ip, session_id).await {
        Some(left) => notify_user_left(state, &left).await,
        None => {
            tracing::debug!("Session '{}' left while not in any room", session_id);
        }
    }
}

async fn handle_get_rooms(state: &Arc<AppState>, session_id: &SessionId) {
    let listing: Vec<RoomSummaryPayload> = state
        .get_rooms_usecase
        .execute()
        .await
        .into_iter()
        .map(Into::into)
        .collect();
    let frame = Envelope::new(EventKind::AvailableRooms, listing).to_json();
    if let Err(e) = state
        .get_rooms_usecase
        .push_room_list(session_id, &frame)
        .await
    {
        tracing::warn!("Failed to send room listing to '{}': {}", session_id, e);
    }
}

/// Fan out `user_left` to the members left behind and, when the room was
/// deleted, `room_list_updated` to everyone.
async fn notify_user_left(state: &Arc<AppState>, left: &LeaveSnapshot) {
    let frame = Envelope::new(EventKind::UserLeft, UserLeftPayload::from(left)).to_json();
    if let Err(e) = state
        .leave_room_usecase
        .broadcast_user_left(left.targets.clone(), &frame)
        .await
    {
        tracing::warn!("Failed to broadcast user_left in room {}: {}", left.room_code, e);
    }
    tracing::info!(
        "User '{}' left room {} ({} remaining)",
        left.username,
        left.room_code,
        left.user_count
    );

    if left.room_deleted {
        tracing::info!("Room {} removed after its last member left", left.room_code);
        let update = Envelope::new(EventKind::RoomListUpdated, serde_json::json!({})).to_json();
        if let Err(e) = state
            .leave_room_usecase
            .broadcast_room_list_updated(&update)
            .await
        {
            tracing::warn!("Failed to broadcast room_list_updated: {}", e);
        }
    }
}
