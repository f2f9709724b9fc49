//! Data Transfer Objects (DTOs) for the relay.
//!
//! DTOs are organized by protocol:
//! - `line`: newline-delimited bracket-tag frames of the chat protocol
//! - `http`: HTTP status API response DTOs

pub mod conversion;
pub mod http;
pub mod line;
