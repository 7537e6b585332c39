//! HTTP API DTOs for the operational endpoints.

use serde::{Deserialize, Serialize};

/// One room as returned by `GET /api/rooms`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomSummaryDto {
    pub id: String,
    pub participants: Vec<String>,
    /// "active" while at least one connection is attached, else "idle"
    pub state: String,
    /// Number of currently attached connections
    pub connections: usize,
    /// RFC 3339, UTC
    pub created_at: String,
}
