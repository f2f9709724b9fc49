//! UseCase: メッセージ送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() メソッド
//! - 送信者のアクティブルームへの配信と履歴追加、送信者への配信確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：同じルームを見ているユーザーにだけ届き、送信者には DELIVERED が届く
//! - エッジケース：アクティブルームが削除済み（履歴には残らないが DELIVERED は届く）

use std::sync::Arc;

use serambi_shared::time::Clock;

use crate::{
    domain::{ChatMessage, ConnectionId, MessageId, MessagePusher, PresenceRepository, Username},
    infrastructure::dto::line::ServerFrame,
};

use super::RoomPublisher;

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    presence: Arc<dyn PresenceRepository>,
    publisher: Arc<RoomPublisher>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl SendMessageUseCase {
    pub fn new(
        presence: Arc<dyn PresenceRepository>,
        publisher: Arc<RoomPublisher>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            presence,
            publisher,
            message_pusher,
            clock,
        }
    }

    /// メッセージ送信を実行
    ///
    /// # Returns
    ///
    /// 配信したメッセージ（ID とタイムスタンプ付き）
    pub async fn execute(
        &self,
        connection: ConnectionId,
        sender: Username,
        body: String,
    ) -> ChatMessage {
        // 1. 送信者のアクティブルームを取得
        let room = self.presence.get_active_room(&sender).await;

        // 2. メッセージを生成
        let message = ChatMessage {
            id: MessageId::generate(),
            timestamp: self.clock.now_millis(),
            sender,
            body,
        };

        // 3. 履歴に追加してルームに配信
        let frame = ServerFrame::from(&message).to_string();
        self.publisher.publish(&room, &frame).await;

        // 4. 送信者にだけ配信確認
        let delivered = ServerFrame::Delivered(message.id.clone()).to_string();
        if let Err(e) = self.message_pusher.push_to(connection, &delivered).await {
            tracing::warn!("Failed to send delivery receipt: {}", e);
        }

        message
    }
}
