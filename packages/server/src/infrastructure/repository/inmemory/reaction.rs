//! InMemory Reaction Repository 実装
//!
//! message id → emoji → users. Emptied entries are pruned so that toggling
//! twice restores the exact prior state.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{MessageId, ReactionRepository, ReactionToggle, Username};

type EmojiReactors = HashMap<String, BTreeSet<Username>>;

#[derive(Default)]
pub struct InMemoryReactionRepository {
    reactions: Mutex<HashMap<MessageId, EmojiReactors>>,
}

impl InMemoryReactionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    async fn message_count(&self) -> usize {
        self.reactions.lock().await.len()
    }

    /// Users currently reacting to `message_id` with `emoji`, sorted
    #[cfg(test)]
    async fn reactors(&self, message_id: &MessageId, emoji: &str) -> Vec<Username> {
        let reactions = self.reactions.lock().await;
        reactions
            .get(message_id)
            .and_then(|per_message| per_message.get(emoji))
            .map(|users| users.iter().cloned().collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ReactionRepository for InMemoryReactionRepository {
    async fn toggle(
        &self,
        message_id: MessageId,
        emoji: String,
        username: Username,
    ) -> ReactionToggle {
        let mut reactions = self.reactions.lock().await;
        let per_message = reactions.entry(message_id.clone()).or_default();
        let reactors = per_message.entry(emoji.clone()).or_default();

        let added = if reactors.remove(&username) {
            false
        } else {
            reactors.insert(username.clone());
            true
        };

        if reactors.is_empty() {
            per_message.remove(&emoji);
        }
        if per_message.is_empty() {
            reactions.remove(&message_id);
        }

        ReactionToggle {
            message_id,
            emoji,
            username,
            added,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_toggle_adds_then_removes() {
        // テスト項目: 同じリアクションを 2 回送ると追加→削除になり、元の状態に戻る
        // given (前提条件):
        let repo = InMemoryReactionRepository::new();
        let id = MessageId::new("m1");
        let bob = Username::new("bob");

        // when (操作):
        let first = repo
            .toggle(id.clone(), "👍".to_string(), bob.clone())
            .await;
        let reactors_after_first = repo.reactors(&id, "👍").await;
        let second = repo
            .toggle(id.clone(), "👍".to_string(), bob.clone())
            .await;

        // then (期待する結果):
        assert!(first.added);
        assert_eq!(reactors_after_first, vec![bob.clone()]);
        assert!(!second.added);
        assert!(repo.reactors(&id, "👍").await.is_empty());
        assert_eq!(repo.message_count().await, 0);
    }

    #[tokio::test]
    async fn test_toggle_is_per_user_and_emoji() {
        // テスト項目: 他ユーザー・他の絵文字のリアクションには影響しない
        // given (前提条件):
        let repo = InMemoryReactionRepository::new();
        let id = MessageId::new("m1");
        repo.toggle(id.clone(), "👍".to_string(), Username::new("alice"))
            .await;
        repo.toggle(id.clone(), "🎉".to_string(), Username::new("bob"))
            .await;

        // when (操作):
        repo.toggle(id.clone(), "👍".to_string(), Username::new("bob"))
            .await;
        repo.toggle(id.clone(), "👍".to_string(), Username::new("bob"))
            .await;

        // then (期待する結果):
        assert_eq!(repo.reactors(&id, "👍").await, vec![Username::new("alice")]);
        assert_eq!(repo.reactors(&id, "🎉").await, vec![Username::new("bob")]);
    }

    #[tokio::test]
    async fn test_reactions_on_unknown_message_are_stored() {
        // テスト項目: 存在確認のない ID へのリアクションもそのまま保存される
        // given (前提条件):
        let repo = InMemoryReactionRepository::new();
        let id = MessageId::new("never-sent");

        // when (操作):
        let toggle = repo
            .toggle(id.clone(), "❤".to_string(), Username::new("carol"))
            .await;

        // then (期待する結果):
        assert!(toggle.added);
        assert_eq!(toggle.message_id, id);
        assert_eq!(repo.reactors(&id, "❤").await.len(), 1);
    }
}
