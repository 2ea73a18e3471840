//! In-memory registry implementations backed by mutex-guarded collections.

mod connections;
mod rooms;

pub use connections::InMemoryConnectionRegistry;
pub use rooms::InMemoryRoomRegistry;
