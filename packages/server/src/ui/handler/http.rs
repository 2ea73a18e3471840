//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{Json, extract::State};

use crate::infrastructure::dto::websocket::RoomSummaryPayload;
use crate::ui::state::AppState;

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Open-room listing, same shape as the `available_rooms` event.
pub async fn get_open_rooms(State(state): State<Arc<AppState>>) -> Json<Vec<RoomSummaryPayload>> {
    let rooms = state.get_rooms_usecase.execute().await;
    Json(rooms.into_iter().map(Into::into).collect())
}
