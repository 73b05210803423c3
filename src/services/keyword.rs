//! Keyword collection service.
//!
//! Owns the one persisted collection: every read loads it from the store and
//! every write persists the whole collection back under a single key.

use crate::data::default_keywords;
use crate::models::{Keyword, KeywordFilter, KeywordStatistics, KeywordUpdate};
use crate::storage::{DEFAULT_STORAGE_KEY, KeyValueStore};
use crate::{Error, Result};
use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};
use tracing::instrument;

/// Service for reading and mutating the keyword collection.
///
/// Each operation holds an internal lock for its whole load-modify-persist
/// cycle, so concurrent callers sharing the service through an `Arc` never
/// interleave writes.
pub struct KeywordService {
    /// Backing store.
    store: Mutex<Box<dyn KeyValueStore>>,
    /// Key the collection is persisted under.
    storage_key: String,
}

impl KeywordService {
    /// Creates a service over the given store with the default key.
    #[must_use]
    pub fn new(store: impl KeyValueStore + 'static) -> Self {
        Self::with_storage_key(store, DEFAULT_STORAGE_KEY)
    }

    /// Creates a service persisting under a custom key.
    #[must_use]
    pub fn with_storage_key(
        store: impl KeyValueStore + 'static,
        storage_key: impl Into<String>,
    ) -> Self {
        Self {
            store: Mutex::new(Box::new(store)),
            storage_key: storage_key.into(),
        }
    }

    /// Returns the storage key.
    #[must_use]
    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    fn lock(&self) -> Result<MutexGuard<'_, Box<dyn KeyValueStore>>> {
        self.store
            .lock()
            .map_err(|e| Error::operation("lock_store", e))
    }

    /// Loads the collection, falling back to the bundled defaults.
    fn load(&self, store: &dyn KeyValueStore) -> Vec<Keyword> {
        match store.get(&self.storage_key) {
            Ok(Some(text)) => serde_json::from_str(&text).unwrap_or_else(|e| {
                tracing::warn!(
                    key = %self.storage_key,
                    error = %e,
                    "Stored keyword collection is unreadable, using defaults"
                );
                default_keywords()
            }),
            Ok(None) => default_keywords(),
            Err(e) => {
                tracing::warn!(
                    key = %self.storage_key,
                    error = %e,
                    "Failed to read keyword collection, using defaults"
                );
                default_keywords()
            },
        }
    }

    fn save(&self, store: &mut dyn KeyValueStore, keywords: &[Keyword]) -> Result<()> {
        let text = serde_json::to_string_pretty(keywords)
            .map_err(|e| Error::operation("save_keywords", e))?;
        store
            .set(&self.storage_key, &text)
            .map_err(|e| Error::operation("save_keywords", e))?;
        tracing::debug!(key = %self.storage_key, count = keywords.len(), "Saved keyword collection");
        Ok(())
    }

    /// Returns the whole collection.
    ///
    /// A missing or unreadable collection yields the bundled defaults.
    ///
    /// # Errors
    ///
    /// Returns an error only if the internal lock is poisoned.
    pub fn get_all(&self) -> Result<Vec<Keyword>> {
        let store = self.lock()?;
        Ok(self.load(&**store))
    }

    /// Returns the keyword with the given term.
    ///
    /// # Errors
    ///
    /// Returns an error only if the internal lock is poisoned.
    pub fn get(&self, term: &str) -> Result<Option<Keyword>> {
        Ok(self.get_all()?.into_iter().find(|k| k.term == term))
    }

    /// Returns the keywords matching a filter, in collection order.
    ///
    /// # Errors
    ///
    /// Returns an error only if the internal lock is poisoned.
    pub fn list(&self, filter: &KeywordFilter) -> Result<Vec<Keyword>> {
        Ok(self
            .get_all()?
            .into_iter()
            .filter(|k| filter.matches(k))
            .collect())
    }

    /// Appends a new keyword.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the term is blank,
    /// [`Error::DuplicateKey`] if the term is taken, or
    /// [`Error::OperationFailed`] if persisting fails.
    #[instrument(skip(self, keyword), fields(term = %keyword.term))]
    pub fn create(&self, keyword: Keyword) -> Result<Keyword> {
        if keyword.term.trim().is_empty() {
            return Err(Error::InvalidInput("Term cannot be empty".to_string()));
        }

        let mut store = self.lock()?;
        let mut keywords = self.load(&**store);
        if keywords.iter().any(|k| k.term == keyword.term) {
            return Err(Error::DuplicateKey(keyword.term));
        }

        keywords.push(keyword.clone());
        self.save(&mut **store, &keywords)?;
        metrics::counter!("keywords_mutations_total", "operation" => "create").increment(1);
        Ok(keyword)
    }

    /// Updates the keyword with the given term, keeping its position.
    ///
    /// Fields the update leaves unset keep their value. Setting a new term
    /// renames the keyword.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no keyword has `term`,
    /// [`Error::DuplicateKey`] if the new term belongs to another keyword,
    /// [`Error::InvalidInput`] if the new term is blank, or
    /// [`Error::OperationFailed`] if persisting fails.
    #[instrument(skip(self, update))]
    pub fn update(&self, term: &str, update: impl Into<KeywordUpdate>) -> Result<Keyword> {
        let update = update.into();

        let mut store = self.lock()?;
        let mut keywords = self.load(&**store);
        let index = keywords
            .iter()
            .position(|k| k.term == term)
            .ok_or_else(|| Error::NotFound(term.to_string()))?;

        if let Some(new_term) = update.term.as_deref() {
            if new_term.trim().is_empty() {
                return Err(Error::InvalidInput("Term cannot be empty".to_string()));
            }
            if new_term != term && keywords.iter().any(|k| k.term == new_term) {
                return Err(Error::DuplicateKey(new_term.to_string()));
            }
        }

        update.apply_to(&mut keywords[index]);
        let updated = keywords[index].clone();
        self.save(&mut **store, &keywords)?;
        metrics::counter!("keywords_mutations_total", "operation" => "update").increment(1);
        Ok(updated)
    }

    /// Removes the keyword with the given term.
    ///
    /// Returns `false`, without persisting, if no keyword has the term.
    ///
    /// # Errors
    ///
    /// Returns an error if persisting fails.
    #[instrument(skip(self))]
    pub fn delete(&self, term: &str) -> Result<bool> {
        Ok(self.delete_batch(&[term])? == 1)
    }

    /// Removes every keyword whose term is listed, persisting once.
    ///
    /// Unknown terms are ignored. Returns the number removed.
    ///
    /// # Errors
    ///
    /// Returns an error if persisting fails.
    pub fn delete_batch<T: AsRef<str>>(&self, terms: &[T]) -> Result<usize> {
        let targets: HashSet<&str> = terms.iter().map(AsRef::as_ref).collect();

        let mut store = self.lock()?;
        let mut keywords = self.load(&**store);
        let before = keywords.len();
        keywords.retain(|k| !targets.contains(k.term.as_str()));
        let removed = before - keywords.len();

        if removed > 0 {
            self.save(&mut **store, &keywords)?;
            metrics::counter!("keywords_mutations_total", "operation" => "delete")
                .increment(removed as u64);
        }
        tracing::debug!(requested = targets.len(), removed, "Deleted keywords");
        Ok(removed)
    }

    /// Computes statistics over the current collection.
    ///
    /// # Errors
    ///
    /// Returns an error only if the internal lock is poisoned.
    pub fn statistics(&self) -> Result<KeywordStatistics> {
        Ok(KeywordStatistics::from_keywords(&self.get_all()?))
    }

    /// Discards the persisted collection so reads return the defaults again.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails to remove the key.
    #[instrument(skip(self))]
    pub fn reset_to_default(&self) -> Result<()> {
        let mut store = self.lock()?;
        store
            .remove(&self.storage_key)
            .map_err(|e| Error::operation("reset_keywords", e))?;
        tracing::info!(key = %self.storage_key, "Reset keyword collection to defaults");
        Ok(())
    }

    /// Replaces the whole collection.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateKey`] if two keywords share a term, or an
    /// error if persisting fails.
    pub fn replace_all(&self, keywords: Vec<Keyword>) -> Result<()> {
        let mut seen = HashSet::new();
        if let Some(dup) = keywords.iter().find(|k| !seen.insert(k.term.as_str())) {
            return Err(Error::DuplicateKey(dup.term.clone()));
        }

        let mut store = self.lock()?;
        self.save(&mut **store, &keywords)
    }

    /// Runs a load-modify-persist cycle under the lock.
    ///
    /// `f` receives the current collection and returns the collection to
    /// keep plus a value handed back to the caller. The returned collection
    /// is persisted only when `persist` is true.
    ///
    /// # Errors
    ///
    /// Returns an error if persisting fails.
    pub fn transaction<T>(
        &self,
        persist: bool,
        f: impl FnOnce(Vec<Keyword>) -> (Vec<Keyword>, T),
    ) -> Result<T> {
        let mut store = self.lock()?;
        let current = self.load(&**store);
        let (next, output) = f(current);
        if persist {
            self.save(&mut **store, &next)?;
        }
        Ok(output)
    }
}

impl std::fmt::Debug for KeywordService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeywordService")
            .field("storage_key", &self.storage_key)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::default_keywords;
    use crate::models::Category;
    use crate::storage::MemoryStore;

    fn service() -> KeywordService {
        KeywordService::new(MemoryStore::new())
    }

    fn empty_service() -> KeywordService {
        let service = service();
        service.replace_all(Vec::new()).unwrap();
        service
    }

    /// Store whose writes always fail, as when storage quota is exhausted.
    struct FullStore(MemoryStore);

    impl KeyValueStore for FullStore {
        fn get(&self, key: &str) -> Result<Option<String>> {
            self.0.get(key)
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<()> {
            Err(Error::operation("write_store_file", "quota exceeded"))
        }

        fn remove(&mut self, key: &str) -> Result<()> {
            self.0.remove(key)
        }
    }

    fn full_service(keywords: &[Keyword]) -> KeywordService {
        let text = serde_json::to_string(keywords).unwrap();
        KeywordService::new(FullStore(MemoryStore::with_entry(DEFAULT_STORAGE_KEY, text)))
    }

    fn is_save_failure(err: &Error) -> bool {
        matches!(err, Error::OperationFailed { operation, .. } if operation == "save_keywords")
    }

    #[test]
    fn test_missing_key_yields_defaults() {
        assert_eq!(service().get_all().unwrap(), default_keywords());
    }

    #[test]
    fn test_corrupt_data_yields_defaults() {
        let store = MemoryStore::with_entry(DEFAULT_STORAGE_KEY, "{not json");
        let service = KeywordService::new(store);
        assert_eq!(service.get_all().unwrap().len(), default_keywords().len());
    }

    #[test]
    fn test_create_and_get() {
        let service = empty_service();
        service.create(Keyword::new("A", "a")).unwrap();
        assert_eq!(service.get("A").unwrap().unwrap().description, "a");
        assert!(service.get("B").unwrap().is_none());
    }

    #[test]
    fn test_create_rejects_duplicate_and_blank() {
        let service = empty_service();
        service.create(Keyword::new("A", "a")).unwrap();
        assert!(matches!(
            service.create(Keyword::new("A", "again")),
            Err(Error::DuplicateKey(t)) if t == "A"
        ));
        assert!(matches!(
            service.create(Keyword::new("  ", "x")),
            Err(Error::InvalidInput(_))
        ));
        assert_eq!(service.get_all().unwrap().len(), 1);
    }

    #[test]
    fn test_update_keeps_position() {
        let service = empty_service();
        for t in ["A", "B", "C"] {
            service.create(Keyword::new(t, t)).unwrap();
        }
        service
            .update("B", KeywordUpdate::new().with_term("B2").with_description("new"))
            .unwrap();

        let terms: Vec<_> = service.get_all().unwrap().into_iter().map(|k| k.term).collect();
        assert_eq!(terms, vec!["A", "B2", "C"]);
        assert_eq!(service.get("B2").unwrap().unwrap().description, "new");
    }

    #[test]
    fn test_update_errors() {
        let service = empty_service();
        service.create(Keyword::new("A", "a")).unwrap();
        service.create(Keyword::new("B", "b")).unwrap();

        assert!(matches!(
            service.update("Z", KeywordUpdate::new()),
            Err(Error::NotFound(_))
        ));
        assert!(matches!(
            service.update("A", KeywordUpdate::new().with_term("B")),
            Err(Error::DuplicateKey(_))
        ));
        // Renaming to itself is not a conflict.
        service
            .update("A", KeywordUpdate::new().with_term("A"))
            .unwrap();
    }

    #[test]
    fn test_delete_and_batch() {
        let service = empty_service();
        for t in ["A", "B", "C", "D"] {
            service.create(Keyword::new(t, t)).unwrap();
        }
        assert!(service.delete("A").unwrap());
        assert!(!service.delete("A").unwrap());
        assert_eq!(service.delete_batch(&["B", "C", "missing"]).unwrap(), 2);
        assert_eq!(service.get_all().unwrap().len(), 1);
    }

    #[test]
    fn test_list_filters() {
        let service = empty_service();
        service
            .create(Keyword::new("Flow", "deep focus").with_category(Category::MetaThinking))
            .unwrap();
        service.create(Keyword::new("Other", "x")).unwrap();

        let filter = KeywordFilter::new().with_category(Category::MetaThinking.as_str());
        let found = service.list(&filter).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].term, "Flow");
    }

    #[test]
    fn test_reset_restores_defaults() {
        let service = empty_service();
        assert!(service.get_all().unwrap().is_empty());
        service.reset_to_default().unwrap();
        assert_eq!(service.get_all().unwrap(), default_keywords());
    }

    #[test]
    fn test_replace_all_rejects_duplicates() {
        let service = service();
        let result = service.replace_all(vec![Keyword::new("A", "1"), Keyword::new("A", "2")]);
        assert!(matches!(result, Err(Error::DuplicateKey(_))));
        assert_eq!(service.get_all().unwrap(), default_keywords());
    }

    #[test]
    fn test_statistics_of_empty_collection() {
        let stats = empty_service().statistics().unwrap();
        assert_eq!(stats.total, 0);
        assert!(stats.by_category.is_empty());
        assert!(stats.avg_examples.abs() < f64::EPSILON);
    }

    #[test]
    fn test_transaction_without_persist() {
        let service = empty_service();
        let count = service
            .transaction(false, |mut all| {
                all.push(Keyword::new("ghost", "g"));
                let n = all.len();
                (all, n)
            })
            .unwrap();
        assert_eq!(count, 1);
        assert!(service.get_all().unwrap().is_empty());
    }

    #[test]
    fn test_write_failure_surfaces_and_keeps_collection() {
        let existing = vec![Keyword::new("A", "a"), Keyword::new("B", "b")];
        let service = full_service(&existing);

        let err = service.create(Keyword::new("C", "c")).unwrap_err();
        assert!(is_save_failure(&err), "unexpected error: {err}");
        assert!(err.to_string().contains("quota exceeded"));

        let err = service
            .update("A", KeywordUpdate::new().with_description("changed"))
            .unwrap_err();
        assert!(is_save_failure(&err));

        assert!(is_save_failure(&service.delete("B").unwrap_err()));
        assert!(is_save_failure(&service.replace_all(Vec::new()).unwrap_err()));

        assert_eq!(service.get_all().unwrap(), existing);
    }

    #[test]
    fn test_concurrent_creates_are_all_kept() {
        use std::sync::Arc;
        use std::thread;

        let service = Arc::new(empty_service());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let service = Arc::clone(&service);
                thread::spawn(move || {
                    service
                        .create(Keyword::new(format!("t{i}"), "d"))
                        .unwrap();
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(service.get_all().unwrap().len(), 8);
    }
}
