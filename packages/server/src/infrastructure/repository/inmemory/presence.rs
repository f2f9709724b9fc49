//! InMemory Presence Repository 実装

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{PresenceRepository, RoomName, Username};

/// username → active room
#[derive(Default)]
pub struct InMemoryPresenceRepository {
    active_rooms: Mutex<HashMap<Username, RoomName>>,
}

impl InMemoryPresenceRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PresenceRepository for InMemoryPresenceRepository {
    async fn set_active_room(&self, username: Username, room: RoomName) {
        let mut active_rooms = self.active_rooms.lock().await;
        active_rooms.insert(username, room);
    }

    async fn get_active_room(&self, username: &Username) -> RoomName {
        let active_rooms = self.active_rooms.lock().await;
        active_rooms
            .get(username)
            .cloned()
            .unwrap_or_else(RoomName::general)
    }

    async fn get_active_rooms(&self, usernames: &[Username]) -> Vec<RoomName> {
        let active_rooms = self.active_rooms.lock().await;
        usernames
            .iter()
            .map(|u| active_rooms.get(u).cloned().unwrap_or_else(RoomName::general))
            .collect()
    }

    async fn clear(&self, username: &Username) {
        let mut active_rooms = self.active_rooms.lock().await;
        active_rooms.remove(username);
    }

    async fn relocate(&self, from: &RoomName, to: &RoomName) -> Vec<Username> {
        let mut active_rooms = self.active_rooms.lock().await;
        let mut moved = Vec::new();
        for (username, room) in active_rooms.iter_mut() {
            if room == from {
                *room = to.clone();
                moved.push(username.clone());
            }
        }
        moved.sort();
        moved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unknown_user_defaults_to_general() {
        // テスト項目: 未登録ユーザーのアクティブルームは general
        // given (前提条件):
        let repo = InMemoryPresenceRepository::new();

        // when (操作):
        let room = repo.get_active_room(&Username::new("nobody")).await;

        // then (期待する結果):
        assert_eq!(room, RoomName::general());
    }

    #[tokio::test]
    async fn test_set_and_clear_active_room() {
        // テスト項目: 存在確認なしで設定でき、クリア後は general に戻る
        // given (前提条件):
        let repo = InMemoryPresenceRepository::new();
        let alice = Username::new("alice");

        // when (操作):
        repo.set_active_room(alice.clone(), RoomName::new("does-not-exist"))
            .await;
        let before = repo.get_active_room(&alice).await;
        repo.clear(&alice).await;
        let after = repo.get_active_room(&alice).await;

        // then (期待する結果):
        assert_eq!(before, RoomName::new("does-not-exist"));
        assert_eq!(after, RoomName::general());
    }

    #[tokio::test]
    async fn test_get_active_rooms_preserves_order() {
        // テスト項目: 複数ユーザーのアクティブルームが入力順で返される
        // given (前提条件):
        let repo = InMemoryPresenceRepository::new();
        repo.set_active_room(Username::new("bob"), RoomName::new("games"))
            .await;

        // when (操作):
        let rooms = repo
            .get_active_rooms(&[Username::new("alice"), Username::new("bob")])
            .await;

        // then (期待する結果):
        assert_eq!(rooms, vec![RoomName::general(), RoomName::new("games")]);
    }

    #[tokio::test]
    async fn test_relocate_moves_only_matching_users() {
        // テスト項目: 指定ルームを見ているユーザーだけが移動する
        // given (前提条件):
        let repo = InMemoryPresenceRepository::new();
        repo.set_active_room(Username::new("alice"), RoomName::new("x"))
            .await;
        repo.set_active_room(Username::new("carol"), RoomName::new("x"))
            .await;
        repo.set_active_room(Username::new("bob"), RoomName::new("y"))
            .await;

        // when (操作):
        let moved = repo.relocate(&RoomName::new("x"), &RoomName::general()).await;

        // then (期待する結果):
        assert_eq!(moved, vec![Username::new("alice"), Username::new("carol")]);
        assert_eq!(
            repo.get_active_room(&Username::new("bob")).await,
            RoomName::new("y")
        );
    }
}
