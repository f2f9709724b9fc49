//! Domain error types.

use thiserror::Error;

use super::value_object::ConnectionId;

/// Failures of room-store operations.
///
/// The `Display` text is the reason a client receives in `[ROOM_ERROR]`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoomError {
    #[error("Room '{0}' already exists")]
    RoomExists(String),

    #[error("Invalid room name '{0}'")]
    InvalidName(String),

    #[error("Room '{0}' not found")]
    NotFound(String),

    #[error("Room '{0}' cannot be deleted")]
    ProtectedRoom(String),
}

/// Failure to deliver a frame to one peer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("Client '{0}' not found")]
    ClientNotFound(ConnectionId),

    #[error("Failed to push message to client '{0}'")]
    PushFailed(ConnectionId),
}

/// Failure to persist an uploaded blob
#[derive(Debug, Error)]
pub enum BlobStoreError {
    #[error("Blob storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_error_reasons() {
        // テスト項目: クライアントに返す理由文字列が各エラーで区別できる
        // given (前提条件):
        let errors = [
            RoomError::RoomExists("games".to_string()),
            RoomError::InvalidName("".to_string()),
            RoomError::NotFound("nowhere".to_string()),
            RoomError::ProtectedRoom("general".to_string()),
        ];

        // when (操作):
        let reasons: Vec<String> = errors.iter().map(|e| e.to_string()).collect();

        // then (期待する結果):
        assert_eq!(reasons[0], "Room 'games' already exists");
        assert_eq!(reasons[1], "Invalid room name ''");
        assert_eq!(reasons[2], "Room 'nowhere' not found");
        assert_eq!(reasons[3], "Room 'general' cannot be deleted");
    }
}
