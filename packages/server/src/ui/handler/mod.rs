//! Connection and HTTP handlers.

mod connection;
mod http;
mod router;

pub use connection::handle_connection;
pub use http::{get_room_detail, get_rooms, get_users, health_check};
