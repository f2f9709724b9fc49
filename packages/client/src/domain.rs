//! Domain logic for client-side operations.
//!
//! This module contains pure functions that implement business logic
//! without side effects, making them easy to test.

use serambi_server::{
    domain::{RoomName, Username},
    infrastructure::dto::line::ServerFrame,
};

/// What the client knows about its own session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientState {
    pub username: Username,
    /// Room that plain chat and `/file` go to
    pub active_room: RoomName,
}

impl ClientState {
    pub fn new(username: Username) -> Self {
        Self {
            username,
            active_room: RoomName::general(),
        }
    }

    /// Follow the server's confirmations of room changes
    pub fn apply(&mut self, frame: &ServerFrame) {
        match frame {
            ServerFrame::RoomJoined(room) | ServerFrame::RoomCreated(room) => {
                self.active_room = room.clone();
            }
            ServerFrame::Users(users) => {
                if let Some(room) = users.get(self.username.as_str()) {
                    self.active_room = RoomName::new(room.as_str());
                }
            }
            _ => {}
        }
    }
}

/// Check if the client should attempt to reconnect.
///
/// # Arguments
///
/// * `current_attempt` - The number of failed attempts so far
/// * `max_attempts` - The maximum number of reconnection attempts allowed
pub fn should_attempt_reconnect(current_attempt: u32, max_attempts: u32) -> bool {
    current_attempt < max_attempts
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_state_follows_room_confirmations() {
        // テスト項目: ROOM_JOINED / ROOM_CREATED でアクティブルームが切り替わる
        // given (前提条件):
        let mut state = ClientState::new(Username::new("alice"));

        // when (操作):
        state.apply(&ServerFrame::RoomCreated(RoomName::new("games")));

        // then (期待する結果):
        assert_eq!(state.active_room, RoomName::new("games"));
        state.apply(&ServerFrame::RoomJoined(RoomName::general()));
        assert_eq!(state.active_room, RoomName::general());
    }

    #[test]
    fn test_state_follows_relocation_in_user_list() {
        // テスト項目: ルーム削除で general に戻されたことをユーザー一覧から反映する
        // given (前提条件):
        let mut state = ClientState::new(Username::new("alice"));
        state.active_room = RoomName::new("x");
        let mut users = BTreeMap::new();
        users.insert("alice".to_string(), "general".to_string());
        users.insert("bob".to_string(), "x".to_string());

        // when (操作):
        state.apply(&ServerFrame::Users(users));

        // then (期待する結果):
        assert_eq!(state.active_room, RoomName::general());
    }

    #[test]
    fn test_should_attempt_reconnect() {
        // テスト項目: 最大試行回数に達するまでは再接続する
        // given (前提条件) / when (操作) / then (期待する結果):
        assert!(should_attempt_reconnect(0, 5));
        assert!(should_attempt_reconnect(4, 5));
        assert!(!should_attempt_reconnect(5, 5));
    }
}
