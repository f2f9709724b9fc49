//! Multi-room chat relay over a newline-delimited TCP protocol.
//!
//! The relay tracks who is online and which room each user is viewing, and
//! fans chat messages, typing indicators, reactions and receipts out to the
//! right audience.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub mod config;
pub mod error;

pub use config::ServerConfig;
pub use error::ServerError;
