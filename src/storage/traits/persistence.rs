//! Key-value store trait.

use crate::Result;

/// Trait for the key-value store that holds the serialized collection.
///
/// This is the only persistence seam of the crate: the whole collection
/// lives under a single key as pretty-printed JSON. Implementations must make
/// `set` atomic with respect to `get`, so that a reader sees either the old
/// text or the new text and never a partial write.
pub trait KeyValueStore: Send {
    /// Reads the text stored under `key`, or `None` if nothing is stored.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous text.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`. Removing an absent key is not an error.
    fn remove(&mut self, key: &str) -> Result<()>;

    /// Checks if anything is stored under `key`.
    fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}
