//! Line protocol frames.
//!
//! Every frame is one UTF-8 line. Commands start with a bracketed tag
//! (`[JOIN_ROOM]games`); a line that does not start with `[` is chat text.
//! Payload fields are positional and `:`-separated, so field order and
//! delimiters must match exactly what peers expect.

use std::{collections::BTreeMap, fmt};

use thiserror::Error;

use crate::domain::{MessageId, RoomName, Username};

/// Bracket tags of the protocol
pub mod tag {
    pub const TYPING: &str = "[TYPING]";
    pub const STOP_TYPING: &str = "[STOP_TYPING]";
    pub const REACTION: &str = "[REACTION]";
    pub const READ: &str = "[READ]";
    pub const CREATE_ROOM: &str = "[CREATE_ROOM]";
    pub const JOIN_ROOM: &str = "[JOIN_ROOM]";
    pub const DELETE_ROOM: &str = "[DELETE_ROOM]";
    pub const SWITCH_ROOM: &str = "[SWITCH_ROOM]";
    pub const GET_HISTORY: &str = "[GET_HISTORY]";
    pub const FILE: &str = "[FILE]";

    pub const INFO: &str = "[INFO]";
    pub const USERS: &str = "[USERS]";
    pub const ROOM_LIST: &str = "[ROOM_LIST]";
    pub const ROOM_CREATED: &str = "[ROOM_CREATED]";
    pub const ROOM_JOINED: &str = "[ROOM_JOINED]";
    pub const ROOM_ERROR: &str = "[ROOM_ERROR]";
    pub const DELIVERED: &str = "[DELIVERED]";
    pub const FILE_SHARED: &str = "[FILE_SHARED]";
    /// Opening of a chat frame; the id follows up to the closing bracket
    pub const MSG_ID_PREFIX: &str = "[MSG_ID:";
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    #[error("empty frame")]
    Empty,

    #[error("unrecognized tag in frame '{0}'")]
    UnrecognizedTag(String),

    #[error("malformed {tag} frame: {reason}")]
    Malformed {
        tag: &'static str,
        reason: &'static str,
    },
}

fn malformed(tag: &'static str, reason: &'static str) -> FrameError {
    FrameError::Malformed { tag, reason }
}

/// Split `[TAG]payload` into (`[TAG]`, `payload`)
fn split_tag(line: &str) -> Result<(&str, &str), FrameError> {
    match line.find(']') {
        Some(end) => Ok((&line[..=end], &line[end + 1..])),
        None => Err(FrameError::UnrecognizedTag(line.to_string())),
    }
}

/// A frame sent by a peer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientFrame {
    Typing,
    StopTyping,
    Reaction { message_id: MessageId, emoji: String },
    Read { message_id: MessageId },
    CreateRoom(RoomName),
    JoinRoom(RoomName),
    DeleteRoom(RoomName),
    SwitchRoom(RoomName),
    GetHistory(RoomName),
    File {
        room: RoomName,
        filename: String,
        size: u64,
        /// Base64, still encoded
        payload: String,
    },
    Chat(String),
}

impl ClientFrame {
    /// Classify one inbound line. Surrounding whitespace is ignored.
    ///
    /// A line starting with `[` never falls back to chat: unknown tags and
    /// bad payloads are reported as errors for the caller to drop.
    pub fn parse(line: &str) -> Result<Self, FrameError> {
        let line = line.trim();
        if line.is_empty() {
            return Err(FrameError::Empty);
        }
        if !line.starts_with('[') {
            return Ok(Self::Chat(line.to_string()));
        }

        let (frame_tag, payload) = split_tag(line)?;
        let room = || RoomName::new(payload.trim());
        match frame_tag {
            tag::TYPING => Ok(Self::Typing),
            tag::STOP_TYPING => Ok(Self::StopTyping),
            tag::REACTION => {
                let (id, emoji) = payload
                    .split_once(':')
                    .ok_or(malformed(tag::REACTION, "expected msgId:emoji"))?;
                if id.is_empty() || emoji.is_empty() {
                    return Err(malformed(tag::REACTION, "empty message id or emoji"));
                }
                Ok(Self::Reaction {
                    message_id: MessageId::new(id),
                    emoji: emoji.to_string(),
                })
            }
            tag::READ => {
                if payload.is_empty() {
                    return Err(malformed(tag::READ, "empty message id"));
                }
                Ok(Self::Read {
                    message_id: MessageId::new(payload),
                })
            }
            tag::CREATE_ROOM => Ok(Self::CreateRoom(room())),
            tag::JOIN_ROOM => Ok(Self::JoinRoom(room())),
            tag::DELETE_ROOM => Ok(Self::DeleteRoom(room())),
            tag::SWITCH_ROOM => Ok(Self::SwitchRoom(room())),
            tag::GET_HISTORY => Ok(Self::GetHistory(room())),
            tag::FILE => Self::parse_file(payload),
            other => Err(FrameError::UnrecognizedTag(other.to_string())),
        }
    }

    fn parse_file(payload: &str) -> Result<Self, FrameError> {
        let mut fields = payload.splitn(4, ':');
        let (Some(room), Some(filename), Some(size), Some(data)) =
            (fields.next(), fields.next(), fields.next(), fields.next())
        else {
            return Err(malformed(tag::FILE, "expected room:filename:size:base64"));
        };
        let size = size
            .parse::<u64>()
            .map_err(|_| malformed(tag::FILE, "size is not a number"))?;

        Ok(Self::File {
            room: RoomName::new(room),
            filename: filename.to_string(),
            size,
            payload: data.to_string(),
        })
    }
}

impl fmt::Display for ClientFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Typing => f.write_str(tag::TYPING),
            Self::StopTyping => f.write_str(tag::STOP_TYPING),
            Self::Reaction { message_id, emoji } => {
                write!(f, "{}{}:{}", tag::REACTION, message_id, emoji)
            }
            Self::Read { message_id } => write!(f, "{}{}", tag::READ, message_id),
            Self::CreateRoom(room) => write!(f, "{}{}", tag::CREATE_ROOM, room),
            Self::JoinRoom(room) => write!(f, "{}{}", tag::JOIN_ROOM, room),
            Self::DeleteRoom(room) => write!(f, "{}{}", tag::DELETE_ROOM, room),
            Self::SwitchRoom(room) => write!(f, "{}{}", tag::SWITCH_ROOM, room),
            Self::GetHistory(room) => write!(f, "{}{}", tag::GET_HISTORY, room),
            Self::File {
                room,
                filename,
                size,
                payload,
            } => write!(f, "{}{}:{}:{}:{}", tag::FILE, room, filename, size, payload),
            Self::Chat(text) => f.write_str(text),
        }
    }
}

/// A frame sent by the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerFrame {
    Info(String),
    /// username → active room
    Users(BTreeMap<String, String>),
    RoomList(Vec<String>),
    Typing(Username),
    StopTyping(Username),
    Reaction {
        message_id: MessageId,
        emoji: String,
        username: Username,
    },
    Read {
        message_id: MessageId,
        username: Username,
    },
    RoomCreated(RoomName),
    RoomJoined(RoomName),
    RoomError(String),
    Delivered(MessageId),
    Chat {
        message_id: MessageId,
        /// `HH:MM:SS`
        time: String,
        sender: Username,
        body: String,
    },
    FileShared {
        room: RoomName,
        file_id: MessageId,
        filename: String,
        sender: Username,
        size: u64,
        payload: String,
    },
}

impl ServerFrame {
    /// Parse one line received from the server
    pub fn parse(line: &str) -> Result<Self, FrameError> {
        let line = line.trim_end_matches(['\r', '\n']);
        if line.is_empty() {
            return Err(FrameError::Empty);
        }
        if let Some(rest) = line.strip_prefix(tag::MSG_ID_PREFIX) {
            return Self::parse_chat(rest);
        }

        let (frame_tag, payload) = split_tag(line)?;
        match frame_tag {
            tag::INFO => Ok(Self::Info(
                payload.strip_prefix(' ').unwrap_or(payload).to_string(),
            )),
            tag::USERS => serde_json::from_str(payload)
                .map(Self::Users)
                .map_err(|_| malformed(tag::USERS, "invalid JSON object")),
            tag::ROOM_LIST => serde_json::from_str(payload)
                .map(Self::RoomList)
                .map_err(|_| malformed(tag::ROOM_LIST, "invalid JSON array")),
            tag::TYPING => Ok(Self::Typing(Username::new(payload))),
            tag::STOP_TYPING => Ok(Self::StopTyping(Username::new(payload))),
            tag::REACTION => {
                let (id, rest) = payload
                    .split_once(':')
                    .ok_or(malformed(tag::REACTION, "expected msgId:emoji:user"))?;
                let (emoji, user) = rest
                    .rsplit_once(':')
                    .ok_or(malformed(tag::REACTION, "expected msgId:emoji:user"))?;
                Ok(Self::Reaction {
                    message_id: MessageId::new(id),
                    emoji: emoji.to_string(),
                    username: Username::new(user),
                })
            }
            tag::READ => {
                let (id, user) = payload
                    .split_once(':')
                    .ok_or(malformed(tag::READ, "expected msgId:user"))?;
                Ok(Self::Read {
                    message_id: MessageId::new(id),
                    username: Username::new(user),
                })
            }
            tag::ROOM_CREATED => Ok(Self::RoomCreated(RoomName::new(payload))),
            tag::ROOM_JOINED => Ok(Self::RoomJoined(RoomName::new(payload))),
            tag::ROOM_ERROR => Ok(Self::RoomError(payload.to_string())),
            tag::DELIVERED => Ok(Self::Delivered(MessageId::new(payload))),
            tag::FILE_SHARED => Self::parse_file_shared(payload),
            other => Err(FrameError::UnrecognizedTag(other.to_string())),
        }
    }

    /// `<id>][HH:MM:SS] sender: body` (the `[MSG_ID:` prefix already stripped)
    fn parse_chat(rest: &str) -> Result<Self, FrameError> {
        const TAG: &str = tag::MSG_ID_PREFIX;
        let (id, rest) = rest
            .split_once(']')
            .ok_or(malformed(TAG, "unterminated message id"))?;
        let rest = rest
            .strip_prefix('[')
            .ok_or(malformed(TAG, "missing timestamp"))?;
        let (time, rest) = rest
            .split_once(']')
            .ok_or(malformed(TAG, "unterminated timestamp"))?;
        let rest = rest.strip_prefix(' ').unwrap_or(rest);
        let (sender, body) = rest
            .split_once(": ")
            .ok_or(malformed(TAG, "expected 'sender: body'"))?;

        Ok(Self::Chat {
            message_id: MessageId::new(id),
            time: time.to_string(),
            sender: Username::new(sender),
            body: body.to_string(),
        })
    }

    fn parse_file_shared(payload: &str) -> Result<Self, FrameError> {
        let fields: Vec<&str> = payload.splitn(6, ':').collect();
        let [room, id, filename, sender, size, data] = fields[..] else {
            return Err(malformed(
                tag::FILE_SHARED,
                "expected room:id:filename:sender:size:base64",
            ));
        };
        let size = size
            .parse::<u64>()
            .map_err(|_| malformed(tag::FILE_SHARED, "size is not a number"))?;

        Ok(Self::FileShared {
            room: RoomName::new(room),
            file_id: MessageId::new(id),
            filename: filename.to_string(),
            sender: Username::new(sender),
            size,
            payload: data.to_string(),
        })
    }
}

impl fmt::Display for ServerFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info(text) => write!(f, "{} {}", tag::INFO, text),
            Self::Users(users) => {
                let json = serde_json::to_string(users).map_err(|_| fmt::Error)?;
                write!(f, "{}{}", tag::USERS, json)
            }
            Self::RoomList(rooms) => {
                let json = serde_json::to_string(rooms).map_err(|_| fmt::Error)?;
                write!(f, "{}{}", tag::ROOM_LIST, json)
            }
            Self::Typing(username) => write!(f, "{}{}", tag::TYPING, username),
            Self::StopTyping(username) => write!(f, "{}{}", tag::STOP_TYPING, username),
            Self::Reaction {
                message_id,
                emoji,
                username,
            } => write!(f, "{}{}:{}:{}", tag::REACTION, message_id, emoji, username),
            Self::Read {
                message_id,
                username,
            } => write!(f, "{}{}:{}", tag::READ, message_id, username),
            Self::RoomCreated(room) => write!(f, "{}{}", tag::ROOM_CREATED, room),
            Self::RoomJoined(room) => write!(f, "{}{}", tag::ROOM_JOINED, room),
            Self::RoomError(reason) => write!(f, "{}{}", tag::ROOM_ERROR, reason),
            Self::Delivered(message_id) => write!(f, "{}{}", tag::DELIVERED, message_id),
            Self::Chat {
                message_id,
                time,
                sender,
                body,
            } => write!(
                f,
                "{}{}][{}] {}: {}",
                tag::MSG_ID_PREFIX,
                message_id,
                time,
                sender,
                body
            ),
            Self::FileShared {
                room,
                file_id,
                filename,
                sender,
                size,
                payload,
            } => write!(
                f,
                "{}{}:{}:{}:{}:{}:{}",
                tag::FILE_SHARED,
                room,
                file_id,
                filename,
                sender,
                size,
                payload
            ),
        }
    }
}
