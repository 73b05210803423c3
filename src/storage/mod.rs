//! Storage layer abstraction.
//!
//! The collection is persisted as one text value in a [`KeyValueStore`]:
//! - [`MemoryStore`]: process-local, for tests and ephemeral runs
//! - [`FilesystemStore`]: one JSON file per key with atomic replace

pub mod persistence;
pub mod traits;

pub use persistence::{FilesystemStore, MemoryStore};
pub use traits::KeyValueStore;

/// Storage key holding the serialized keyword collection.
pub const DEFAULT_STORAGE_KEY: &str = "magic_keywords_data";
