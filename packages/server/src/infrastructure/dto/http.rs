//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

/// One entry of `GET /api/rooms`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSummaryDto {
    pub name: String,
    pub creator: Option<String>,
    /// Number of members
    pub members: usize,
    pub history_len: usize,
    pub history_capacity: usize,
}

/// Body of `GET /api/rooms/{name}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomDetailDto {
    pub name: String,
    pub creator: Option<String>,
    pub members: Vec<String>,
    /// Serialized frames, oldest first
    pub history: Vec<String>,
}
