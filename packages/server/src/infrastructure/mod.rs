//! Infrastructure layer: concrete stores, the broadcaster and wire DTOs.

pub mod blob_store;
pub mod dto;
pub mod message_pusher;
pub mod registry;
pub mod repository;
