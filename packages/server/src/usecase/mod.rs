//! Use case layer: one struct per protocol concern.
//!
//! Use cases depend only on the domain traits; the composition root in
//! `ui::state` wires them to the in-memory infrastructure.

mod connect_participant;
mod disconnect_participant;
mod error;
mod manage_rooms;
mod notify_activity;
mod publish;
mod send_message;
mod share_file;
mod snapshot;

pub use connect_participant::ConnectParticipantUseCase;
pub use disconnect_participant::DisconnectParticipantUseCase;
pub use error::ShareFileError;
pub use manage_rooms::ManageRoomsUseCase;
pub use notify_activity::NotifyActivityUseCase;
pub use publish::RoomPublisher;
pub use send_message::SendMessageUseCase;
pub use share_file::ShareFileUseCase;
pub use snapshot::StateSnapshotUseCase;

#[cfg(test)]
pub(crate) mod test_support;
