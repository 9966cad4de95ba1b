//! Blacklist implementations.

mod memory;

pub use memory::InMemoryBlacklist;
