//! Input line parsing: slash commands and plain chat.

use std::path::{Path, PathBuf};

use base64::{Engine, engine::general_purpose::STANDARD};
use serambi_server::{
    domain::{MessageId, RoomName},
    infrastructure::dto::line::ClientFrame,
};

use crate::error::{ClientError, CommandError};

pub const HELP: &str = "\
/create <room>        create a room and move into it
/join <room>          join a room
/delete <room>        delete a room
/switch <room>        view a room and replay its history
/history [room]       replay the history of a room (default: current)
/react <msgId> <emoji> toggle a reaction
/read <msgId>         send a read receipt
/typing, /stop        typing indicator on / off
/file <path>          share a file in the current room
/quit                 leave";

/// One line typed by the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Chat(String),
    Create(RoomName),
    Join(RoomName),
    Delete(RoomName),
    Switch(RoomName),
    History(Option<RoomName>),
    React { message_id: MessageId, emoji: String },
    Read(MessageId),
    Typing,
    StopTyping,
    File(PathBuf),
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let line = line.trim();
        let Some(rest) = line.strip_prefix('/') else {
            // the server treats a leading '[' as a tag and drops unknown ones
            if line.starts_with('[') {
                return Err(CommandError::BracketedChat);
            }
            return Ok(Self::Chat(line.to_string()));
        };

        let (name, args) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
        let args = args.trim();
        let room = |usage: &'static str| {
            if args.is_empty() {
                Err(CommandError::Usage(usage))
            } else {
                Ok(RoomName::new(args))
            }
        };

        match name {
            "create" => room("/create <room>").map(Self::Create),
            "join" => room("/join <room>").map(Self::Join),
            "delete" => room("/delete <room>").map(Self::Delete),
            "switch" => room("/switch <room>").map(Self::Switch),
            "history" => Ok(Self::History(
                (!args.is_empty()).then(|| RoomName::new(args)),
            )),
            "react" => match args.split_once(char::is_whitespace) {
                Some((id, emoji)) if !emoji.trim().is_empty() => Ok(Self::React {
                    message_id: MessageId::new(id),
                    emoji: emoji.trim().to_string(),
                }),
                _ => Err(CommandError::Usage("/react <msgId> <emoji>")),
            },
            "read" if !args.is_empty() => Ok(Self::Read(MessageId::new(args))),
            "read" => Err(CommandError::Usage("/read <msgId>")),
            "typing" => Ok(Self::Typing),
            "stop" => Ok(Self::StopTyping),
            "file" if !args.is_empty() => Ok(Self::File(PathBuf::from(args))),
            "file" => Err(CommandError::Usage("/file <path>")),
            "help" => Ok(Self::Help),
            "quit" | "exit" => Ok(Self::Quit),
            other => Err(CommandError::UnknownCommand(other.to_string())),
        }
    }

    /// Frames to send for this command. `File`, `Help` and `Quit` produce none.
    pub fn frames(&self, active_room: &RoomName) -> Vec<ClientFrame> {
        match self {
            Self::Chat(text) => vec![ClientFrame::Chat(text.clone())],
            Self::Create(room) => vec![ClientFrame::CreateRoom(room.clone())],
            Self::Join(room) => vec![ClientFrame::JoinRoom(room.clone())],
            Self::Delete(room) => vec![ClientFrame::DeleteRoom(room.clone())],
            Self::Switch(room) => vec![
                ClientFrame::SwitchRoom(room.clone()),
                ClientFrame::GetHistory(room.clone()),
            ],
            Self::History(room) => vec![ClientFrame::GetHistory(
                room.clone().unwrap_or_else(|| active_room.clone()),
            )],
            Self::React { message_id, emoji } => vec![ClientFrame::Reaction {
                message_id: message_id.clone(),
                emoji: emoji.clone(),
            }],
            Self::Read(message_id) => vec![ClientFrame::Read {
                message_id: message_id.clone(),
            }],
            Self::Typing => vec![ClientFrame::Typing],
            Self::StopTyping => vec![ClientFrame::StopTyping],
            Self::File(_) | Self::Help | Self::Quit => Vec::new(),
        }
    }
}

/// Read `path` and wrap it in a `[FILE]` frame for `room`
pub async fn file_frame(path: &Path, room: &RoomName) -> Result<ClientFrame, ClientError> {
    let data = tokio::fs::read(path)
        .await
        .map_err(|source| ClientError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("file")
        .replace(':', "_");

    Ok(ClientFrame::File {
        room: room.clone(),
        filename,
        size: data.len() as u64,
        payload: STANDARD.encode(&data),
    })
}
