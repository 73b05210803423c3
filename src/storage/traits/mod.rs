//! Storage backend traits.

mod persistence;

pub use persistence::KeyValueStore;
