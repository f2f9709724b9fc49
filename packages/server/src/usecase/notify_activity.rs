//! UseCase: アクティビティ通知（入力中・リアクション・既読）
//!
//! どれもルームに関係なく全接続に配信されます。

use std::sync::Arc;

use crate::{
    domain::{MessageId, MessagePusher, ReactionRepository, TypingRepository, Username},
    infrastructure::dto::line::ServerFrame,
};

/// アクティビティ通知のユースケース
pub struct NotifyActivityUseCase {
    typing: Arc<dyn TypingRepository>,
    reactions: Arc<dyn ReactionRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl NotifyActivityUseCase {
    pub fn new(
        typing: Arc<dyn TypingRepository>,
        reactions: Arc<dyn ReactionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            typing,
            reactions,
            message_pusher,
        }
    }

    /// 入力中状態を更新して全員に通知
    pub async fn set_typing(&self, username: Username, is_typing: bool) {
        self.typing.set_typing(username.clone(), is_typing).await;
        let frame = if is_typing {
            ServerFrame::Typing(username)
        } else {
            ServerFrame::StopTyping(username)
        };
        self.message_pusher.broadcast_all(&frame.to_string()).await;
    }

    /// リアクションをトグルして全員に通知
    pub async fn react(&self, username: Username, message_id: MessageId, emoji: String) {
        let toggle = self.reactions.toggle(message_id, emoji, username).await;
        tracing::debug!(
            "Reaction {} {} on '{}' by '{}'",
            if toggle.added { "added" } else { "removed" },
            toggle.emoji,
            toggle.message_id,
            toggle.username
        );
        let frame = ServerFrame::from(toggle);
        self.message_pusher.broadcast_all(&frame.to_string()).await;
    }

    /// 既読を全員に通知（状態は保持しない）
    pub async fn mark_read(&self, username: Username, message_id: MessageId) {
        let frame = ServerFrame::Read {
            message_id,
            username,
        };
        self.message_pusher.broadcast_all(&frame.to_string()).await;
    }
}
