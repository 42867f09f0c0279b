//! Store client implementations.

mod memory;

pub use memory::MemoryStore;
