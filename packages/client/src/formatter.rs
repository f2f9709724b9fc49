//! Message formatting utilities for client display.

use serambi_server::{domain::Username, infrastructure::dto::line::ServerFrame};

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format one server frame for the terminal.
    ///
    /// Returns `None` for frames not worth a line, such as the user's own
    /// typing indicator.
    pub fn format_frame(frame: &ServerFrame, me: &Username) -> Option<String> {
        let line = match frame {
            ServerFrame::Info(text) => format!("* {}", text),
            ServerFrame::Users(users) => {
                let entries: Vec<String> = users
                    .iter()
                    .map(|(user, room)| {
                        let me_suffix = if user == me.as_str() { " (me)" } else { "" };
                        format!("{}{} @{}", user, me_suffix, room)
                    })
                    .collect();
                format!("Online: {}", entries.join(", "))
            }
            ServerFrame::RoomList(rooms) => format!("Rooms: {}", rooms.join(", ")),
            ServerFrame::Typing(user) if user != me => format!("{} is typing...", user),
            ServerFrame::StopTyping(user) if user != me => {
                format!("{} stopped typing", user)
            }
            ServerFrame::Typing(_) | ServerFrame::StopTyping(_) => return None,
            ServerFrame::Reaction {
                message_id,
                emoji,
                username,
            } => format!("{} reacted {} to {}", username, emoji, message_id),
            ServerFrame::Read {
                message_id,
                username,
            } => format!("{} read {}", username, message_id),
            ServerFrame::RoomCreated(room) => format!("Created room '{}'", room),
            ServerFrame::RoomJoined(room) => format!("Now in room '{}'", room),
            ServerFrame::RoomError(reason) => format!("! {}", reason),
            ServerFrame::Delivered(message_id) => format!("✓ delivered {}", message_id),
            ServerFrame::Chat {
                message_id,
                time,
                sender,
                body,
            } => format!("[{}] {}: {}  ({})", time, sender, body, message_id),
            ServerFrame::FileShared {
                room,
                file_id,
                filename,
                sender,
                size,
                ..
            } => format!(
                "[file] {} shared '{}' ({} bytes) in {}  ({})",
                sender, filename, size, room, file_id
            ),
        };
        Some(line)
    }

    /// Format a line the server sent that does not parse as a frame
    pub fn format_raw_message(text: &str) -> String {
        format!("? {}", text)
    }
}
