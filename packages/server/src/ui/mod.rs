//! Transport layer: TCP accept loop, per-connection handling and the HTTP status API.

mod handler;
mod server;
mod signal;
pub mod state;

pub use server::Server;
pub use state::AppState;
