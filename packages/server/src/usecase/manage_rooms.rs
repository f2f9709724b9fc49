//! UseCase: ルーム操作（作成・参加・削除・切り替え・履歴取得）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - 各操作の成功時に誰に何が届くか
//! - 失敗時に RoomError が返り、他の接続には何も届かないこと
//!
//! ### どのような状況を想定しているか
//! - 正常系：作成→自動参加、参加、削除→general への移動、切り替え、履歴再送
//! - 異常系：重複作成、不正な名前、存在しないルーム、general の削除

use std::sync::Arc;

use crate::{
    domain::{
        ConnectionId, MessagePusher, PresenceRepository, RoomError, RoomName, RoomRepository,
        Username,
    },
    infrastructure::dto::line::ServerFrame,
};

use super::StateSnapshotUseCase;

/// ルーム操作のユースケース
///
/// 失敗は呼び出し元に返すだけで、`[ROOM_ERROR]` の送信は呼び出し元が行います。
pub struct ManageRoomsUseCase {
    rooms: Arc<dyn RoomRepository>,
    presence: Arc<dyn PresenceRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    snapshot: Arc<StateSnapshotUseCase>,
}

impl ManageRoomsUseCase {
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

    async fn reply(&self, connection: ConnectionId, frame: ServerFrame) {
        if let Err(e) = self
            .message_pusher
            .push_to(connection, &frame.to_string())
            .await
        {
            tracing::warn!("Failed to reply to '{}': {}", connection, e);
        }
    }

    /// ルームを作成し、作成者を参加させてアクティブルームにする
    pub async fn create(
        &self,
        connection: ConnectionId,
        creator: Username,
        name: RoomName,
    ) -> Result<(), RoomError> {
        self.rooms.create_room(name.clone(), creator.clone()).await?;
        self.snapshot.broadcast_room_list().await;

        self.rooms.join_room(&name, creator.clone()).await?;
        self.presence
            .set_active_room(creator.clone(), name.clone())
            .await;
        self.reply(connection, ServerFrame::RoomCreated(name.clone()))
            .await;
        self.snapshot.broadcast_user_list().await;

        tracing::info!("Room '{}' created by '{}'", name, creator);
        Ok(())
    }

    /// 既存のルームに参加してアクティブルームにする
    pub async fn join(
        &self,
        connection: ConnectionId,
        username: Username,
        name: RoomName,
    ) -> Result<(), RoomError> {
        self.rooms.join_room(&name, username.clone()).await?;
        self.presence
            .set_active_room(username.clone(), name.clone())
            .await;
        self.reply(connection, ServerFrame::RoomJoined(name.clone()))
            .await;
        self.snapshot.broadcast_user_list().await;

        tracing::info!("'{}' joined room '{}'", username, name);
        Ok(())
    }

    /// ルームを削除する。そのルームを見ていたユーザーは general に移動する
    pub async fn delete(&self, name: RoomName) -> Result<(), RoomError> {
        self.rooms.delete_room(&name).await?;
        self.snapshot.broadcast_room_list().await;
        self.snapshot.broadcast_user_list().await;

        let notice = ServerFrame::Info(format!("Room '{}' has been deleted", name));
        self.message_pusher.broadcast_all(&notice.to_string()).await;

        tracing::info!("Room '{}' deleted", name);
        Ok(())
    }

    /// アクティブルームを切り替える。存在確認もメンバー確認もしない
    pub async fn switch(&self, username: Username, name: RoomName) {
        self.presence.set_active_room(username, name).await;
        self.snapshot.broadcast_user_list().await;
    }

    /// 履歴を古い順に要求者にだけ送る。未知のルームなら何も送らない
    pub async fn history(&self, connection: ConnectionId, name: &RoomName) {
        for frame in self.rooms.get_history(name).await {
            if let Err(e) = self.message_pusher.push_to(connection, &frame).await {
                tracing::warn!("Stopped history replay of '{}': {}", name, e);
                break;
            }
        }
    }
}
