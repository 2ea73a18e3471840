//! Registry implementations.

mod inmemory;

pub use inmemory::{InMemoryConnectionRegistry, InMemoryRoomRegistry};
