//! InMemory Typing Repository 実装

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{TypingRepository, Username};

/// username → typing flag. Not scoped to a room.
#[derive(Default)]
pub struct InMemoryTypingRepository {
    typing: Mutex<HashMap<Username, bool>>,
}

impl InMemoryTypingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub(crate) async fn is_typing(&self, username: &Username) -> bool {
        let typing = self.typing.lock().await;
        typing.get(username).copied().unwrap_or(false)
    }
}

#[async_trait]
impl TypingRepository for InMemoryTypingRepository {
    async fn set_typing(&self, username: Username, is_typing: bool) {
        let mut typing = self.typing.lock().await;
        typing.insert(username, is_typing);
    }

    async fn clear(&self, username: &Username) {
        let mut typing = self.typing.lock().await;
        typing.remove(username);
    }
}
