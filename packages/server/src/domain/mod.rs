//! Domain layer: value objects, entities, errors and the seams the
//! use cases depend on.

pub mod entity;
pub mod error;
pub mod pusher;
pub mod repository;
pub mod value_object;

pub use entity::{ChatMessage, ReactionToggle, Room, SharedFile};
pub use error::{BlobStoreError, MessagePushError, RoomError};
pub use pusher::{ConnectedClient, MessagePusher, PusherChannel};
pub use repository::{
    BlobStore, PresenceRepository, ReactionRepository, RoomRepository, TypingRepository,
};
pub use value_object::{
    ConnectionId, GENERAL_ROOM, MAX_ROOM_NAME_CHARS, MessageId, RoomName, Username,
};

#[cfg(test)]
pub use pusher::MockMessagePusher;
#[cfg(test)]
pub use repository::{
    MockBlobStore, MockPresenceRepository, MockReactionRepository, MockRoomRepository,
    MockTypingRepository,
};
