//! In-memory repositories, each guarding one table with its own mutex.

mod presence;
mod reaction;
mod room;
mod typing;

pub use presence::InMemoryPresenceRepository;
pub use reaction::InMemoryReactionRepository;
pub use room::InMemoryRoomRepository;
pub use typing::InMemoryTypingRepository;
