//! mpsc チャンネルを使った MessagePusher 実装
//!
//! ## 責務
//!
//! - ClientRegistry を通じた接続の登録・解除
//! - クライアントへのフレーム送信（push_to, broadcast）
//! - 送信に失敗した接続（writer タスクが終了済み）の登録解除
//!
//! 送信は UnboundedSender への投入のみで、ソケット書き込みは接続ごとの writer タスクが行います。
//! そのため 1 つの遅いピアが他のピアへの配信を止めることはありません。

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    domain::{
        ConnectedClient, ConnectionId, MessagePushError, MessagePusher, PusherChannel, Username,
    },
    infrastructure::registry::ClientRegistry,
};

pub struct ChannelMessagePusher {
    registry: Arc<ClientRegistry>,
}

impl ChannelMessagePusher {
    pub fn new(registry: Arc<ClientRegistry>) -> Self {
        Self { registry }
    }

    /// Send to every channel, then drop the dead ones from the registry
    async fn deliver(
        &self,
        channels: Vec<(ConnectionId, Option<PusherChannel>)>,
        frame: &str,
    ) -> Vec<ConnectionId> {
        let mut dead = Vec::new();
        for (connection, channel) in channels {
            match channel {
                Some(sender) => {
                    if sender.send(frame.to_string()).is_err() {
                        tracing::warn!("Failed to push frame to client '{}'", connection);
                        dead.push(connection);
                    }
                }
                None => {
                    tracing::debug!("Client '{}' not found during broadcast, skipping", connection);
                }
            }
        }

        for connection in &dead {
            if let Some(username) = self.registry.unregister(*connection).await {
                tracing::info!("Removed dead client '{}' ({})", connection, username);
            }
        }
        dead
    }
}

#[async_trait]
impl MessagePusher for ChannelMessagePusher {
    async fn register_client(
        &self,
        connection: ConnectionId,
        username: Username,
        sender: PusherChannel,
    ) {
        self.registry.register(connection, username.clone(), sender).await;
        tracing::debug!("Client '{}' registered as '{}'", connection, username);
    }

    async fn unregister_client(&self, connection: ConnectionId) -> Option<Username> {
        let username = self.registry.unregister(connection).await;
        tracing::debug!("Client '{}' unregistered", connection);
        username
    }

    async fn connected_clients(&self) -> Vec<ConnectedClient> {
        self.registry.snapshot().await
    }

    async fn push_to(
        &self,
        connection: ConnectionId,
        frame: &str,
    ) -> Result<(), MessagePushError> {
        let sender = self
            .registry
            .channel(connection)
            .await
            .ok_or(MessagePushError::ClientNotFound(connection))?;

        if sender.send(frame.to_string()).is_err() {
            self.registry.unregister(connection).await;
            return Err(MessagePushError::PushFailed(connection));
        }
        tracing::debug!("Pushed frame to client '{}': {}", connection, frame);
        Ok(())
    }

    async fn broadcast(&self, targets: Vec<ConnectionId>, frame: &str) -> Vec<ConnectionId> {
        let channels = self.registry.channels(&targets).await;
        tracing::debug!("Broadcasting to {} client(s): {}", channels.len(), frame);
        self.deliver(channels, frame).await
    }

    async fn broadcast_all(&self, frame: &str) -> Vec<ConnectionId> {
        let channels = self
            .registry
            .all_channels()
            .await
            .into_iter()
            .map(|(connection, sender)| (connection, Some(sender)))
            .collect::<Vec<_>>();
        tracing::debug!("Broadcasting to all {} client(s): {}", channels.len(), frame);
        self.deliver(channels, frame).await
    }
}
