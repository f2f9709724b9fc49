//! Domain entities.

use std::collections::{BTreeSet, VecDeque};

use super::value_object::{MessageId, RoomName, Username};

/// Default number of frames retained per room
pub const DEFAULT_HISTORY_CAPACITY: usize = 50;

/// A chat room: member set plus a bounded history of serialized frames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    pub name: RoomName,
    /// `None` for the built-in `general` room
    pub creator: Option<Username>,
    pub members: BTreeSet<Username>,
    history: VecDeque<String>,
    history_capacity: usize,
}

impl Room {
    /// Create an empty room. A capacity of zero is raised to one.
    pub fn new(name: RoomName, creator: Option<Username>, history_capacity: usize) -> Self {
        let history_capacity = history_capacity.max(1);
        Self {
            name,
            creator,
            members: BTreeSet::new(),
            history: VecDeque::with_capacity(history_capacity),
            history_capacity,
        }
    }

    /// Add a member; returns `false` if already present
    pub fn add_member(&mut self, username: Username) -> bool {
        self.members.insert(username)
    }

    /// Append a frame, evicting the oldest once capacity is exceeded.
    ///
    /// Returns the evicted frame, if any.
    pub fn push_history(&mut self, frame: String) -> Option<String> {
        self.history.push_back(frame);
        if self.history.len() > self.history_capacity {
            self.history.pop_front()
        } else {
            None
        }
    }

    pub fn history(&self) -> impl Iterator<Item = &String> {
        self.history.iter()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn history_capacity(&self) -> usize {
        self.history_capacity
    }
}

/// A plain chat message. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: MessageId,
    /// Unix timestamp in milliseconds
    pub timestamp: i64,
    pub sender: Username,
    pub body: String,
}

/// A file shared into a room. `payload` stays base64-encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedFile {
    pub id: MessageId,
    pub room: RoomName,
    pub filename: String,
    pub sender: Username,
    pub size: u64,
    pub payload: String,
}

/// Outcome of toggling one user's emoji on one message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionToggle {
    pub message_id: MessageId,
    pub emoji: String,
    pub username: Username,
    /// `true` if the reaction was added, `false` if it was removed
    pub added: bool,
}
