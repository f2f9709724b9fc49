//! UseCase: 参加者切断処理
//!
//! 接続ごとに 1 回だけ呼ばれます（読み取りループ・書き込み失敗のどちらで終了しても）。
//! 登録解除は冪等なので、ブロードキャスト中にすでに取り除かれた接続でも安全です。

use std::sync::Arc;

use crate::{
    domain::{ConnectionId, MessagePusher, PresenceRepository, TypingRepository, Username},
    infrastructure::dto::line::ServerFrame,
};

use super::StateSnapshotUseCase;

/// 参加者切断のユースケース
pub struct DisconnectParticipantUseCase {
    presence: Arc<dyn PresenceRepository>,
    typing: Arc<dyn TypingRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    snapshot: Arc<StateSnapshotUseCase>,
}

impl DisconnectParticipantUseCase {
    pub fn new(
        presence: Arc<dyn PresenceRepository>,
        typing: Arc<dyn TypingRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        snapshot: Arc<StateSnapshotUseCase>,
    ) -> Self {
        Self {
            presence,
            typing,
            message_pusher,
            snapshot,
        }
    }

    /// 参加者切断を実行
    ///
    /// `username` は接続タスクが保持しているハンドシェイク時の名前です。
    /// 登録解除の戻り値ではなくこちらを使うので、ブロードキャスト中に
    /// 先に登録解除されていても通知と後片付けは必ず行われます。
    pub async fn execute(&self, connection: ConnectionId, username: Username) {
        // 1. 登録解除（冪等）
        self.message_pusher.unregister_client(connection).await;

        // 2. 退出通知
        let left = ServerFrame::Info(format!("{} left", username));
        self.message_pusher.broadcast_all(&left.to_string()).await;

        // 3. 入力中状態をクリア
        self.typing.clear(&username).await;
        let stop = ServerFrame::StopTyping(username.clone());
        self.message_pusher.broadcast_all(&stop.to_string()).await;

        // 4. 同じユーザー名の接続が残っていなければアクティブルームもクリア
        let still_connected = self
            .message_pusher
            .connected_clients()
            .await
            .iter()
            .any(|client| client.username == username);
        if !still_connected {
            self.presence.clear(&username).await;
        }

        // 5. ユーザー一覧を再配信
        self.snapshot.broadcast_user_list().await;

        tracing::info!("User '{}' disconnected ('{}')", username, connection);
    }
}
