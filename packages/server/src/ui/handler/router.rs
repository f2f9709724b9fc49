//! Protocol router: classifies each inbound line and dispatches it.

use std::sync::Arc;

use crate::{
    domain::{ConnectionId, MessagePusher, RoomError, Username},
    infrastructure::dto::line::{ClientFrame, FrameError, ServerFrame},
    ui::state::AppState,
};

/// Dispatcher bound to one connection after its handshake
pub struct ProtocolRouter {
    state: Arc<AppState>,
    connection: ConnectionId,
    username: Username,
}

impl ProtocolRouter {
    pub fn new(state: Arc<AppState>, connection: ConnectionId, username: Username) -> Self {
        Self {
            state,
            connection,
            username,
        }
    }

    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Handle one inbound line. Unknown and malformed frames are dropped.
    pub async fn dispatch(&self, line: &str) {
        let frame = match ClientFrame::parse(line) {
            Ok(frame) => frame,
            Err(FrameError::Empty) => return,
            Err(e) => {
                tracing::warn!("Dropped frame from '{}': {}", self.username, e);
                return;
            }
        };
        tracing::debug!("Received from '{}': {}", self.username, line.trim());

        let username = self.username.clone();
        match frame {
            ClientFrame::Typing => {
                self.state
                    .notify_activity_usecase
                    .set_typing(username, true)
                    .await
            }
            ClientFrame::StopTyping => {
                self.state
                    .notify_activity_usecase
                    .set_typing(username, false)
                    .await
            }
            ClientFrame::Reaction { message_id, emoji } => {
                self.state
                    .notify_activity_usecase
                    .react(username, message_id, emoji)
                    .await
            }
            ClientFrame::Read { message_id } => {
                self.state
                    .notify_activity_usecase
                    .mark_read(username, message_id)
                    .await
            }
            ClientFrame::CreateRoom(name) => {
                let result = self
                    .state
                    .manage_rooms_usecase
                    .create(self.connection, username, name)
                    .await;
                self.report(result).await;
            }
            ClientFrame::JoinRoom(name) => {
                let result = self
                    .state
                    .manage_rooms_usecase
                    .join(self.connection, username, name)
                    .await;
                self.report(result).await;
            }
            ClientFrame::DeleteRoom(name) => {
                let result = self.state.manage_rooms_usecase.delete(name).await;
                self.report(result).await;
            }
            ClientFrame::SwitchRoom(name) => {
                self.state
                    .manage_rooms_usecase
                    .switch(username, name)
                    .await
            }
            ClientFrame::GetHistory(name) => {
                self.state
                    .manage_rooms_usecase
                    .history(self.connection, &name)
                    .await
            }
            ClientFrame::File {
                room,
                filename,
                size,
                payload,
            } => {
                if let Err(e) = self
                    .state
                    .share_file_usecase
                    .execute(username, room, filename, size, payload)
                    .await
                {
                    tracing::warn!("Dropped file from '{}': {}", self.username, e);
                }
            }
            ClientFrame::Chat(body) => {
                self.state
                    .send_message_usecase
                    .execute(self.connection, username, body)
                    .await;
            }
        }
    }

    /// Send `[ROOM_ERROR]<reason>` to this connection only
    async fn report(&self, result: Result<(), RoomError>) {
        let Err(e) = result else {
            return;
        };
        tracing::warn!("Room operation by '{}' failed: {}", self.username, e);
        let frame = ServerFrame::RoomError(e.to_string()).to_string();
        if let Err(e) = self.state.message_pusher.push_to(self.connection, &frame).await {
            tracing::warn!("Failed to report room error: {}", e);
        }
    }
}
