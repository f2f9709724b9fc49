//! Shared application state and its composition.

use std::sync::Arc;

use serambi_shared::time::SystemClock;

use crate::{
    config::ServerConfig,
    domain::{
        BlobStore, MessagePusher, PresenceRepository, ReactionRepository, RoomRepository,
        TypingRepository,
    },
    infrastructure::{
        blob_store::FileSystemBlobStore,
        message_pusher::ChannelMessagePusher,
        registry::ClientRegistry,
        repository::{
            InMemoryPresenceRepository, InMemoryReactionRepository, InMemoryRoomRepository,
            InMemoryTypingRepository,
        },
    },
    usecase::{
        ConnectParticipantUseCase, DisconnectParticipantUseCase, ManageRoomsUseCase,
        NotifyActivityUseCase, RoomPublisher, SendMessageUseCase, ShareFileUseCase,
        StateSnapshotUseCase,
    },
};

/// Shared application state
pub struct AppState {
    /// MessagePusher（メッセージ通知の抽象化）
    pub message_pusher: Arc<dyn MessagePusher>,
    pub connect_participant_usecase: Arc<ConnectParticipantUseCase>,
    pub disconnect_participant_usecase: Arc<DisconnectParticipantUseCase>,
    pub send_message_usecase: Arc<SendMessageUseCase>,
    pub share_file_usecase: Arc<ShareFileUseCase>,
    pub manage_rooms_usecase: Arc<ManageRoomsUseCase>,
    pub notify_activity_usecase: Arc<NotifyActivityUseCase>,
    pub snapshot_usecase: Arc<StateSnapshotUseCase>,
}

impl AppState {
    /// Wire the in-memory infrastructure to the use cases
    pub fn new(config: &ServerConfig) -> Self {
        // Initialize dependencies in order:
        // 1. Repositories
        // 2. MessagePusher
        // 3. UseCases

        // 1. Create Repositories (in-memory tables, filesystem blobs)
        let presence: Arc<dyn PresenceRepository> = Arc::new(InMemoryPresenceRepository::new());
        let rooms: Arc<dyn RoomRepository> = Arc::new(InMemoryRoomRepository::new(
            presence.clone(),
            config.history_capacity,
        ));
        let typing: Arc<dyn TypingRepository> = Arc::new(InMemoryTypingRepository::new());
        let reactions: Arc<dyn ReactionRepository> = Arc::new(InMemoryReactionRepository::new());
        let blob_store: Arc<dyn BlobStore> =
            Arc::new(FileSystemBlobStore::new(config.uploads_dir.clone()));

        // 2. Create MessagePusher (channel implementation over the client registry)
        let registry = Arc::new(ClientRegistry::new());
        let message_pusher: Arc<dyn MessagePusher> = Arc::new(ChannelMessagePusher::new(registry));

        // 3. Create UseCases
        let snapshot_usecase = Arc::new(StateSnapshotUseCase::new(
            rooms.clone(),
            presence.clone(),
            message_pusher.clone(),
        ));
        let publisher = Arc::new(RoomPublisher::new(
            rooms.clone(),
            presence.clone(),
            message_pusher.clone(),
        ));
        let connect_participant_usecase = Arc::new(ConnectParticipantUseCase::new(
            rooms.clone(),
            presence.clone(),
            message_pusher.clone(),
            snapshot_usecase.clone(),
        ));
        let disconnect_participant_usecase = Arc::new(DisconnectParticipantUseCase::new(
            presence.clone(),
            typing.clone(),
            message_pusher.clone(),
            snapshot_usecase.clone(),
        ));
        let send_message_usecase = Arc::new(SendMessageUseCase::new(
            presence.clone(),
            publisher.clone(),
            message_pusher.clone(),
            Arc::new(SystemClock),
        ));
        let share_file_usecase = Arc::new(ShareFileUseCase::new(blob_store, publisher));
        let manage_rooms_usecase = Arc::new(ManageRoomsUseCase::new(
            rooms,
            presence,
            message_pusher.clone(),
            snapshot_usecase.clone(),
        ));
        let notify_activity_usecase = Arc::new(NotifyActivityUseCase::new(
            typing,
            reactions,
            message_pusher.clone(),
        ));

        Self {
            message_pusher,
            connect_participant_usecase,
            disconnect_participant_usecase,
            send_message_usecase,
            share_file_usecase,
            manage_rooms_usecase,
            notify_activity_usecase,
            snapshot_usecase,
        }
    }
}
