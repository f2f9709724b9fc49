//! MessagePusher trait definition
//!
//! Abstraction over frame delivery to connected peers. It also owns the
//! connection ⇔ username registry, because delivery and liveness are decided
//! in the same place: a peer that cannot be written to is unregistered.

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{
    error::MessagePushError,
    value_object::{ConnectionId, Username},
};

/// Outbound channel of one connection; each item is one frame without the newline
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// One registered connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectedClient {
    pub connection: ConnectionId,
    pub username: Username,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// Register a connection after its handshake
    async fn register_client(
        &self,
        connection: ConnectionId,
        username: Username,
        sender: PusherChannel,
    );

    /// Unregister a connection. Idempotent; returns the username if it was registered.
    async fn unregister_client(&self, connection: ConnectionId) -> Option<Username>;

    /// Consistent snapshot of registered connections, ordered by connection id
    async fn connected_clients(&self) -> Vec<ConnectedClient>;

    /// Send a frame to one connection
    async fn push_to(&self, connection: ConnectionId, frame: &str)
    -> Result<(), MessagePushError>;

    /// Send a frame to each target.
    ///
    /// Failures never abort the round; dead targets are unregistered after
    /// it completes and returned.
    async fn broadcast(&self, targets: Vec<ConnectionId>, frame: &str) -> Vec<ConnectionId>;

    /// Send a frame to every registered connection
    async fn broadcast_all(&self, frame: &str) -> Vec<ConnectionId>;
}
