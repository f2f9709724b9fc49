//! Server configuration.

use std::path::PathBuf;

use crate::domain::entity::DEFAULT_HISTORY_CAPACITY;

/// Default chat listener port
pub const DEFAULT_PORT: u16 = 12345;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Bind address of both listeners
    pub host: String,
    /// Chat (line protocol) port
    pub port: u16,
    /// HTTP status API port; the API is disabled when `None`
    pub http_port: Option<u16>,
    /// Root directory of the blob store
    pub uploads_dir: PathBuf,
    /// Per-room history capacity
    pub history_capacity: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            http_port: None,
            uploads_dir: PathBuf::from("uploads"),
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}
