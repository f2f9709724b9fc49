//! UseCase: 参加者接続処理
//!
//! ハンドシェイク（最初の 1 行 = ユーザー名）の後に呼ばれ、
//! 接続の登録から `general` への参加、全体スナップショットの配信までを行います。

use std::sync::Arc;

use crate::{
    domain::{
        ConnectionId, MessagePusher, PresenceRepository, PusherChannel, RoomName, RoomRepository,
        Username,
    },
    infrastructure::dto::line::ServerFrame,
};

use super::StateSnapshotUseCase;

/// 参加者接続のユースケース
pub struct ConnectParticipantUseCase {
    rooms: Arc<dyn RoomRepository>,
    presence: Arc<dyn PresenceRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    snapshot: Arc<StateSnapshotUseCase>,
}

impl ConnectParticipantUseCase {
    pub fn new(
        rooms: Arc<dyn RoomRepository>,
        presence: Arc<dyn PresenceRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        snapshot: Arc<StateSnapshotUseCase>,
    ) -> Self {
        Self {
            rooms,
            presence,
            message_pusher,
            snapshot,
        }
    }

    /// 参加者接続を実行
    ///
    /// # Arguments
    ///
    /// * `connection` - 接続 ID
    /// * `username` - ハンドシェイクで受け取ったユーザー名（検証しない）
    /// * `peer_addr` - 参加通知に表示するリモートアドレス
    /// * `sender` - writer タスクへのチャンネル
    pub async fn execute(
        &self,
        connection: ConnectionId,
        username: Username,
        peer_addr: &str,
        sender: PusherChannel,
    ) {
        // 1. 接続を登録
        self.message_pusher
            .register_client(connection, username.clone(), sender)
            .await;

        // 2. 参加通知を全員に配信
        let joined = ServerFrame::Info(format!("{} joined from {}", username, peer_addr));
        self.message_pusher.broadcast_all(&joined.to_string()).await;

        // 3. general をアクティブルームにしてメンバーに追加
        let general = RoomName::general();
        self.presence
            .set_active_room(username.clone(), general.clone())
            .await;
        if let Err(e) = self.rooms.join_room(&general, username.clone()).await {
            tracing::warn!("Failed to add '{}' to '{}': {}", username, general, e);
        }

        // 4. 全体スナップショットを配信
        self.snapshot.broadcast_user_list().await;
        self.snapshot.broadcast_room_list().await;

        // 5. 本人に参加先を通知
        let room_joined = ServerFrame::RoomJoined(general).to_string();
        if let Err(e) = self.message_pusher.push_to(connection, &room_joined).await {
            tracing::warn!("Failed to confirm join to '{}': {}", username, e);
        }

        tracing::info!("User '{}' connected as '{}'", username, connection);
    }
}
