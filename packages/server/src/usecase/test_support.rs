//! In-memory wiring shared by the use case tests.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::{
    domain::{
        ConnectionId, MessagePusher, PresenceRepository, RoomName, Username,
        entity::DEFAULT_HISTORY_CAPACITY,
    },
    infrastructure::{
        message_pusher::ChannelMessagePusher,
        registry::ClientRegistry,
        repository::{
            InMemoryPresenceRepository, InMemoryReactionRepository, InMemoryRoomRepository,
            InMemoryTypingRepository,
        },
    },
};

use super::{RoomPublisher, StateSnapshotUseCase};

pub(crate) struct TestHarness {
    pub rooms: Arc<InMemoryRoomRepository>,
    pub presence: Arc<InMemoryPresenceRepository>,
    pub typing: Arc<InMemoryTypingRepository>,
    pub reactions: Arc<InMemoryReactionRepository>,
    pub registry: Arc<ClientRegistry>,
    pub message_pusher: Arc<ChannelMessagePusher>,
}

impl TestHarness {
    pub fn new() -> Self {
        let presence = Arc::new(InMemoryPresenceRepository::new());
        let rooms = Arc::new(InMemoryRoomRepository::new(
            presence.clone(),
            DEFAULT_HISTORY_CAPACITY,
        ));
        let registry = Arc::new(ClientRegistry::new());
        Self {
            rooms,
            presence,
            typing: Arc::new(InMemoryTypingRepository::new()),
            reactions: Arc::new(InMemoryReactionRepository::new()),
            message_pusher: Arc::new(ChannelMessagePusher::new(registry.clone())),
            registry,
        }
    }

    /// Register a peer viewing `general`, bypassing the join announcements
    pub async fn connect(&self, id: u64, username: &str) -> TestPeer {
        let connection = ConnectionId::new(id);
        let (tx, rx) = mpsc::unbounded_channel();
        self.message_pusher
            .register_client(connection, Username::new(username), tx)
            .await;
        self.presence
            .set_active_room(Username::new(username), RoomName::general())
            .await;
        TestPeer { connection, rx }
    }

    pub fn publisher(&self) -> RoomPublisher {
        RoomPublisher::new(
            self.rooms.clone(),
            self.presence.clone(),
            self.message_pusher.clone(),
        )
    }

    pub fn snapshot(&self) -> Arc<StateSnapshotUseCase> {
        Arc::new(StateSnapshotUseCase::new(
            self.rooms.clone(),
            self.presence.clone(),
            self.message_pusher.clone(),
        ))
    }
}

pub(crate) struct TestPeer {
    pub connection: ConnectionId,
    rx: mpsc::UnboundedReceiver<String>,
}

impl TestPeer {
    /// Frames queued so far
    pub fn drain(&mut self) -> Vec<String> {
        let mut frames = Vec::new();
        while let Ok(frame) = self.rx.try_recv() {
            frames.push(frame);
        }
        frames
    }

    /// Close the receiving side, as a finished writer task would
    pub fn hang_up(&mut self) {
        self.rx.close();
    }
}
