//! Utilities shared by the Serambi server and client binaries.

pub mod logger;
pub mod time;
