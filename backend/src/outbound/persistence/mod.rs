//! Store adapters for the session aggregate and shared registries.
//!
//! - [`MemoryStateStore`] / [`MemoryRegistry`]: in-process, for tests and
//!   embedding.
//! - [`JsonFileStore`]: one JSON file per namespace in a directory, written
//!   atomically under an advisory directory lock.

mod atomic_io;
mod dir_lock;
mod json_file_store;
mod memory;
mod registry_collections;

pub use json_file_store::JsonFileStore;
pub use memory::{MemoryRegistry, MemoryStateStore};
