//! Result persistence implementations

mod file;
mod in_memory;

pub use file::FileResultStore;
pub use in_memory::InMemoryResultStore;
