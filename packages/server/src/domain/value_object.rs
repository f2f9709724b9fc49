//! Value objects identifying connections, users, rooms and messages.

use std::fmt;

use serde::Serialize;
use uuid::Uuid;

use super::error::RoomError;

/// Name of the permanent default room
pub const GENERAL_ROOM: &str = "general";

/// Maximum room name length, counted in characters
pub const MAX_ROOM_NAME_CHARS: usize = 20;

/// Opaque handle of one live socket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(u64);

impl ConnectionId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Username announced in the handshake line.
///
/// Not validated and not unique: two connections may announce the same name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Username(String);

impl Username {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<&str> for Username {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Room name as carried on the wire.
///
/// Any string is representable so that switch and history requests can name
/// rooms that do not (or no longer) exist. Creation goes through
/// [`RoomName::validate_for_creation`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RoomName(String);

impl RoomName {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn general() -> Self {
        Self(GENERAL_ROOM.to_string())
    }

    pub fn is_general(&self) -> bool {
        self.0 == GENERAL_ROOM
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Non-empty, at most [`MAX_ROOM_NAME_CHARS`] characters, and free of the
    /// `:` field delimiter and line breaks.
    pub fn validate_for_creation(&self) -> Result<(), RoomError> {
        let chars = self.0.chars().count();
        let has_delimiter = self.0.contains([':', '\n', '\r']);
        if chars == 0 || chars > MAX_ROOM_NAME_CHARS || has_delimiter {
            return Err(RoomError::InvalidName(self.0.clone()));
        }
        Ok(())
    }
}

impl fmt::Display for RoomName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a chat message or shared file
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct MessageId(String);

impl MessageId {
    /// Wrap an identifier received from a peer (not checked against history)
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Fresh random identifier (UUID v4)
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
