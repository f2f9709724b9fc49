//! Repository trait definitions.
//!
//! Each shared table of the relay sits behind one of these traits and owns
//! its own lock. Use cases depend on the traits; the in-memory
//! implementations live in the infrastructure layer.

use async_trait::async_trait;

use super::{
    entity::{ReactionToggle, Room},
    error::{BlobStoreError, RoomError},
    value_object::{MessageId, RoomName, Username},
};

/// Room table: lifecycle, membership and per-room history
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// Create an empty room owned by `creator`
    async fn create_room(&self, name: RoomName, creator: Username) -> Result<(), RoomError>;

    /// Delete a room and move every user whose active room it was back to `general`
    async fn delete_room(&self, name: &RoomName) -> Result<(), RoomError>;

    /// Add `username` to the member set (idempotent)
    async fn join_room(&self, name: &RoomName, username: Username) -> Result<(), RoomError>;

    /// Append a serialized frame to the room's history.
    ///
    /// Returns `false` if the room does not exist; nothing is stored then.
    async fn append_history(&self, name: &RoomName, frame: String) -> bool;

    /// Room names in creation order, `general` first
    async fn list_room_names(&self) -> Vec<RoomName>;

    /// History frames oldest first; empty for unknown rooms
    async fn get_history(&self, name: &RoomName) -> Vec<String>;

    /// Snapshot of one room
    async fn get_room(&self, name: &RoomName) -> Option<Room>;

    /// Snapshot of every room in creation order
    async fn get_rooms(&self) -> Vec<Room>;
}

/// Active-room pointer per username, independent of room membership
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PresenceRepository: Send + Sync {
    /// Point `username` at `room`; the room is not required to exist
    async fn set_active_room(&self, username: Username, room: RoomName);

    /// Active room of `username`, `general` when unset
    async fn get_active_room(&self, username: &Username) -> RoomName;

    /// Active rooms of the given users, in the same order
    async fn get_active_rooms(&self, usernames: &[Username]) -> Vec<RoomName>;

    async fn clear(&self, username: &Username);

    /// Rewrite every pointer at `from` to `to`; returns the moved users
    async fn relocate(&self, from: &RoomName, to: &RoomName) -> Vec<Username>;
}

/// Typing flag per username, last write wins
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TypingRepository: Send + Sync {
    async fn set_typing(&self, username: Username, is_typing: bool);

    async fn clear(&self, username: &Username);
}

/// Emoji reactions keyed by message id
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReactionRepository: Send + Sync {
    /// Add the reaction if absent, remove it if present
    async fn toggle(&self, message_id: MessageId, emoji: String, username: Username)
    -> ReactionToggle;
}

/// Opaque storage for uploaded file payloads
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Persist `data` under `id`; `filename` is kept for humans browsing the store
    async fn put(&self, id: &MessageId, filename: &str, data: Vec<u8>)
    -> Result<(), BlobStoreError>;
}
