//! HTTP API endpoint handlers.
//!
//! Read-only views of the relay state; nothing here mutates it.

use std::{collections::BTreeMap, sync::Arc};

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    domain::RoomName,
    infrastructure::dto::http::{RoomDetailDto, RoomSummaryDto},
    ui::state::AppState,
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Get list of rooms
pub async fn get_rooms(State(state): State<Arc<AppState>>) -> Json<Vec<RoomSummaryDto>> {
    let rooms = state.snapshot_usecase.rooms().await;

    // Domain Model から DTO への変換
    Json(rooms.iter().map(RoomSummaryDto::from).collect())
}

/// Get room detail by name
pub async fn get_room_detail(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<RoomDetailDto>, StatusCode> {
    match state.snapshot_usecase.room(&RoomName::new(name)).await {
        Some(room) => Ok(Json(RoomDetailDto::from(room))),
        None => Err(StatusCode::NOT_FOUND),
    }
}

/// Get username → active room of connected users
pub async fn get_users(State(state): State<Arc<AppState>>) -> Json<BTreeMap<String, String>> {
    Json(state.snapshot_usecase.user_map().await)
}
