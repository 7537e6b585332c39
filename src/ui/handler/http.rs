//! HTTP API endpoint handlers (operational surface).

use std::sync::Arc;

use axum::{Json, extract::State};

use crate::{
    domain::RoomState,
    infrastructure::dto::http::RoomSummaryDto,
    time::millis_to_rfc3339,
    ui::state::AppState,
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Rooms known to this process, with live presence counts
pub async fn get_rooms(State(state): State<Arc<AppState>>) -> Json<Vec<RoomSummaryDto>> {
    let rooms = state.rooms.list().await;

    let summaries = rooms
        .iter()
        .map(|room| RoomSummaryDto {
            id: room.id.to_string(),
            participants: vec![room.members.0.to_string(), room.members.1.to_string()],
            state: match room.state() {
                RoomState::Active => "active".to_string(),
                RoomState::Idle => "idle".to_string(),
            },
            connections: room.connections.len(),
            created_at: millis_to_rfc3339(room.created_at.value()),
        })
        .collect();

    Json(summaries)
}
