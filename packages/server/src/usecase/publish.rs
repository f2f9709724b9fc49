//! Room-scoped publication.
//!
//! Chat and file frames go to the users whose active room is the target
//! room. Appending to the history and enqueueing to recipients happen under
//! one sequencer lock, so for every room the history order is the order in
//! which peers receive the frames.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::domain::{ConnectionId, MessagePusher, PresenceRepository, RoomName, RoomRepository};

pub struct RoomPublisher {
    rooms: Arc<dyn RoomRepository>,
    presence: Arc<dyn PresenceRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    sequencer: Mutex<()>,
}

impl RoomPublisher {
    pub fn new(
        rooms: Arc<dyn RoomRepository>,
        presence: Arc<dyn PresenceRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            rooms,
            presence,
            message_pusher,
            sequencer: Mutex::new(()),
        }
    }

    /// Connections whose user currently views `room`
    pub async fn viewers(&self, room: &RoomName) -> Vec<ConnectionId> {
        // registry → presence
        let clients = self.message_pusher.connected_clients().await;
        let usernames: Vec<_> = clients.iter().map(|c| c.username.clone()).collect();
        let active_rooms = self.presence.get_active_rooms(&usernames).await;

        clients
            .into_iter()
            .zip(active_rooms)
            .filter(|(_, active)| active == room)
            .map(|(client, _)| client.connection)
            .collect()
    }

    /// Append `frame` to the history of `room` and send it to the room's viewers.
    ///
    /// The frame is delivered even when the room no longer exists; it is only
    /// stored when it does. Returns whether it was stored.
    pub async fn publish(&self, room: &RoomName, frame: &str) -> bool {
        let _turn = self.sequencer.lock().await;

        let targets = self.viewers(room).await;
        let stored = self.rooms.append_history(room, frame.to_string()).await;
        if !stored {
            tracing::debug!("Room '{}' does not exist, frame not stored", room);
        }

        let dead = self.message_pusher.broadcast(targets, frame).await;
        if !dead.is_empty() {
            tracing::debug!("{} dead client(s) removed while publishing to '{}'", dead.len(), room);
        }
        stored
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecase::test_support::TestHarness;

    #[tokio::test]
    async fn test_publish_reaches_only_viewers_of_room() {
        // テスト項目: アクティブルームが一致する接続にだけ配信され、履歴に追加される
        // given (前提条件):
        let harness = TestHarness::new();
        let mut alice = harness.connect(1, "alice").await;
        let mut bob = harness.connect(2, "bob").await;
        harness
            .rooms
            .create_room(RoomName::new("games"), "alice".into())
            .await
            .unwrap();
        harness
            .presence
            .set_active_room("alice".into(), RoomName::new("games"))
            .await;
        let publisher = harness.publisher();

        // when (操作):
        let stored = publisher.publish(&RoomName::new("games"), "frame-1").await;

        // then (期待する結果):
        assert!(stored);
        assert_eq!(alice.drain(), vec!["frame-1".to_string()]);
        assert!(bob.drain().is_empty());
        assert_eq!(
            harness.rooms.get_history(&RoomName::new("games")).await,
            vec!["frame-1".to_string()]
        );
    }

    #[tokio::test]
    async fn test_publish_to_missing_room_is_delivered_but_not_stored() {
        // テスト項目: 存在しないルームへの配信は行われるが履歴には残らない
        // given (前提条件):
        let harness = TestHarness::new();
        let mut alice = harness.connect(1, "alice").await;
        harness
            .presence
            .set_active_room("alice".into(), RoomName::new("ghost"))
            .await;
        let publisher = harness.publisher();

        // when (操作):
        let stored = publisher.publish(&RoomName::new("ghost"), "frame-1").await;

        // then (期待する結果):
        assert!(!stored);
        assert_eq!(alice.drain(), vec!["frame-1".to_string()]);
        assert!(harness.rooms.get_history(&RoomName::new("ghost")).await.is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_publishes_keep_history_and_delivery_order_equal() {
        // テスト項目: 並行して配信しても履歴の順序と受信順序が一致する
        // given (前提条件):
        let harness = TestHarness::new();
        let mut viewer = harness.connect(1, "viewer").await;
        let publisher = Arc::new(harness.publisher());

        // when (操作):
        let mut handles = Vec::new();
        for task in 0..8 {
            let publisher = Arc::clone(&publisher);
            handles.push(tokio::spawn(async move {
                for i in 0..5 {
                    publisher
                        .publish(&RoomName::general(), &format!("t{}-{}", task, i))
                        .await;
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        // then (期待する結果):
        let received = viewer.drain();
        assert_eq!(received.len(), 40);
        assert_eq!(harness.rooms.get_history(&RoomName::general()).await, received);
    }
}
