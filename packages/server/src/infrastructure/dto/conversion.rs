//! Conversion logic between domain entities and DTOs.

use serambi_shared::time::format_time_of_day;

use crate::domain::{ChatMessage, ReactionToggle, Room, SharedFile};
use crate::infrastructure::dto::{
    http::{RoomDetailDto, RoomSummaryDto},
    line::ServerFrame,
};

// ========================================
// Domain Entity → Line Frame
// ========================================

impl From<&ChatMessage> for ServerFrame {
    fn from(message: &ChatMessage) -> Self {
        Self::Chat {
            message_id: message.id.clone(),
            time: format_time_of_day(message.timestamp),
            sender: message.sender.clone(),
            body: message.body.clone(),
        }
    }
}

impl From<&SharedFile> for ServerFrame {
    fn from(file: &SharedFile) -> Self {
        Self::FileShared {
            room: file.room.clone(),
            file_id: file.id.clone(),
            filename: file.filename.clone(),
            sender: file.sender.clone(),
            size: file.size,
            payload: file.payload.clone(),
        }
    }
}

impl From<ReactionToggle> for ServerFrame {
    fn from(toggle: ReactionToggle) -> Self {
        Self::Reaction {
            message_id: toggle.message_id,
            emoji: toggle.emoji,
            username: toggle.username,
        }
    }
}

// ========================================
// Domain Entity → HTTP DTO
// ========================================

impl From<&Room> for RoomSummaryDto {
    fn from(room: &Room) -> Self {
        Self {
            name: room.name.as_str().to_string(),
            creator: room.creator.as_ref().map(|c| c.as_str().to_string()),
            members: room.members.len(),
            history_len: room.history_len(),
            history_capacity: room.history_capacity(),
        }
    }
}

impl From<Room> for RoomDetailDto {
    fn from(room: Room) -> Self {
        Self {
            name: room.name.as_str().to_string(),
            creator: room.creator.as_ref().map(|c| c.as_str().to_string()),
            members: room
                .members
                .iter()
                .map(|m| m.as_str().to_string())
                .collect(),
            history: room.history().cloned().collect(),
        }
    }
}
