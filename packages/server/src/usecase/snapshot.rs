//! UseCase: full-state snapshots (user list, room list, room details).
//!
//! `[USERS]` and `[ROOM_LIST]` are idempotent full snapshots rather than
//! deltas, so a peer can always resynchronize from the latest one.

use std::{collections::BTreeMap, sync::Arc};

use crate::{
    domain::{MessagePusher, PresenceRepository, Room, RoomName, RoomRepository},
    infrastructure::dto::line::ServerFrame,
};

pub struct StateSnapshotUseCase {
    rooms: Arc<dyn RoomRepository>,
    presence: Arc<dyn PresenceRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl StateSnapshotUseCase {
    pub fn new(
        rooms: Arc<dyn RoomRepository>,
        presence: Arc<dyn PresenceRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            rooms,
            presence,
            message_pusher,
        }
    }

    /// username → active room of every connected user.
    ///
    /// Connections sharing a username collapse into one entry.
    pub async fn user_map(&self) -> BTreeMap<String, String> {
        let clients = self.message_pusher.connected_clients().await;
        let usernames: Vec<_> = clients.into_iter().map(|c| c.username).collect();
        let active_rooms = self.presence.get_active_rooms(&usernames).await;

        usernames
            .into_iter()
            .zip(active_rooms)
            .map(|(username, room)| (username.into_string(), room.into_string()))
            .collect()
    }

    /// Room names in creation order
    pub async fn room_names(&self) -> Vec<String> {
        self.rooms
            .list_room_names()
            .await
            .into_iter()
            .map(RoomName::into_string)
            .collect()
    }

    pub async fn broadcast_user_list(&self) {
        let frame = ServerFrame::Users(self.user_map().await).to_string();
        self.message_pusher.broadcast_all(&frame).await;
    }

    pub async fn broadcast_room_list(&self) {
        let frame = ServerFrame::RoomList(self.room_names().await).to_string();
        self.message_pusher.broadcast_all(&frame).await;
    }

    pub async fn rooms(&self) -> Vec<Room> {
        self.rooms.get_rooms().await
    }

    pub async fn room(&self, name: &RoomName) -> Option<Room> {
        self.rooms.get_room(name).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecase::test_support::TestHarness;

    #[tokio::test]
    async fn test_user_map_reports_active_rooms() {
        // テスト項目: ユーザー一覧が接続中ユーザーとアクティブルームの対応になる
        // given (前提条件):
        let harness = TestHarness::new();
        let _alice = harness.connect(1, "alice").await;
        let _bob = harness.connect(2, "bob").await;
        harness
            .presence
            .set_active_room("bob".into(), RoomName::new("games"))
            .await;
        let snapshot = harness.snapshot();

        // when (操作):
        let users = snapshot.user_map().await;

        // then (期待する結果):
        assert_eq!(users.len(), 2);
        assert_eq!(users["alice"], "general");
        assert_eq!(users["bob"], "games");
    }

    #[tokio::test]
    async fn test_broadcast_room_list_reaches_everyone() {
        // テスト項目: ルーム一覧がアクティブルームに関係なく全員に届く
        // given (前提条件):
        let harness = TestHarness::new();
        let mut alice = harness.connect(1, "alice").await;
        let mut bob = harness.connect(2, "bob").await;
        harness
            .presence
            .set_active_room("bob".into(), RoomName::new("elsewhere"))
            .await;
        harness
            .rooms
            .create_room(RoomName::new("games"), "alice".into())
            .await
            .unwrap();

        // when (操作):
        harness.snapshot().broadcast_room_list().await;

        // then (期待する結果):
        let expected = r#"[ROOM_LIST]["general","games"]"#.to_string();
        assert_eq!(alice.drain(), vec![expected.clone()]);
        assert_eq!(bob.drain(), vec![expected]);
    }
}
