//! Client registry: connection ⇔ username for every live connection.
//!
//! Registration is keyed by connection, so two connections may carry the
//! same username. Readers get cloned snapshots and never hold the lock while
//! writing to sockets.

use std::collections::BTreeMap;

use tokio::sync::Mutex;

use crate::domain::{ConnectedClient, ConnectionId, PusherChannel, Username};

struct RegisteredClient {
    username: Username,
    sender: PusherChannel,
}

#[derive(Default)]
pub struct ClientRegistry {
    clients: Mutex<BTreeMap<ConnectionId, RegisteredClient>>,
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn register(&self, connection: ConnectionId, username: Username, sender: PusherChannel) {
        let mut clients = self.clients.lock().await;
        clients.insert(connection, RegisteredClient { username, sender });
    }

    /// Idempotent; `None` if the connection was never (or is no longer) registered
    pub async fn unregister(&self, connection: ConnectionId) -> Option<Username> {
        let mut clients = self.clients.lock().await;
        clients.remove(&connection).map(|client| client.username)
    }

    /// Usernames of all live connections, ordered by connection id
    pub async fn snapshot(&self) -> Vec<ConnectedClient> {
        let clients = self.clients.lock().await;
        clients
            .iter()
            .map(|(connection, client)| ConnectedClient {
                connection: *connection,
                username: client.username.clone(),
            })
            .collect()
    }

    pub async fn channel(&self, connection: ConnectionId) -> Option<PusherChannel> {
        let clients = self.clients.lock().await;
        clients.get(&connection).map(|client| client.sender.clone())
    }

    /// Channels of the given targets; unknown targets map to `None`
    pub async fn channels(
        &self,
        targets: &[ConnectionId],
    ) -> Vec<(ConnectionId, Option<PusherChannel>)> {
        let clients = self.clients.lock().await;
        targets
            .iter()
            .map(|connection| {
                (
                    *connection,
                    clients.get(connection).map(|client| client.sender.clone()),
                )
            })
            .collect()
    }

    pub async fn all_channels(&self) -> Vec<(ConnectionId, PusherChannel)> {
        let clients = self.clients.lock().await;
        clients
            .iter()
            .map(|(connection, client)| (*connection, client.sender.clone()))
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.clients.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.clients.lock().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn test_register_and_snapshot_in_connection_order() {
        // テスト項目: スナップショットが接続 ID 順で返され、重複ユーザー名も保持される
        // given (前提条件):
        let registry = ClientRegistry::new();
        let (tx, _rx) = mpsc::unbounded_channel();

        // when (操作):
        registry
            .register(ConnectionId::new(2), Username::new("bob"), tx.clone())
            .await;
        registry
            .register(ConnectionId::new(1), Username::new("alice"), tx.clone())
            .await;
        registry
            .register(ConnectionId::new(3), Username::new("alice"), tx)
            .await;

        // then (期待する結果):
        let snapshot = registry.snapshot().await;
        let names: Vec<&str> = snapshot.iter().map(|c| c.username.as_str()).collect();
        assert_eq!(names, vec!["alice", "bob", "alice"]);
        assert_eq!(registry.len().await, 3);
    }

    #[tokio::test]
    async fn test_unregister_is_idempotent() {
        // テスト項目: 登録解除は 2 回目以降も失敗せず None を返す
        // given (前提条件):
        let registry = ClientRegistry::new();
        let (tx, _rx) = mpsc::unbounded_channel();
        let connection = ConnectionId::new(1);
        registry
            .register(connection, Username::new("alice"), tx)
            .await;

        // when (操作):
        let first = registry.unregister(connection).await;
        let second = registry.unregister(connection).await;
        let never_registered = registry.unregister(ConnectionId::new(99)).await;

        // then (期待する結果):
        assert_eq!(first, Some(Username::new("alice")));
        assert_eq!(second, None);
        assert_eq!(never_registered, None);
        assert!(registry.is_empty().await);
    }

    #[tokio::test]
    async fn test_channels_marks_unknown_targets() {
        // テスト項目: 未登録の送信先は None として返される
        // given (前提条件):
        let registry = ClientRegistry::new();
        let (tx, _rx) = mpsc::unbounded_channel();
        registry
            .register(ConnectionId::new(1), Username::new("alice"), tx)
            .await;

        // when (操作):
        let channels = registry
            .channels(&[ConnectionId::new(1), ConnectionId::new(2)])
            .await;

        // then (期待する結果):
        assert!(channels[0].1.is_some());
        assert!(channels[1].1.is_none());
    }
}
