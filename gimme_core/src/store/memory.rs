use super::error::{self, Error};
use super::SnippetStore;
use crate::snippet::{Lookup, Snippet};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// A store that keeps snippets in a map in memory. Clones share the same map,
/// so a test can hold on to one handle while the code under test uses
/// another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    /// The shared bits
    inner: Arc<Mutex<Inner>>,
}

/// State behind the lock.
#[derive(Debug, Default)]
struct Inner {
    /// Snippets by reference code
    snippets: HashMap<String, Snippet>,

    /// If set, every call fails with this message.
    outage: Option<String>,

    /// How many calls (of either kind) have reached the store.
    calls: usize,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following call fail with `message`, or recover with `None`.
    pub fn set_outage(&self, message: Option<String>) {
        self.lock().outage = message;
    }

    /// Look at what's stored under a key without counting it as a call.
    pub fn get(&self, key: &str) -> Option<Snippet> {
        self.lock().snippets.get(key).cloned()
    }

    /// How many reads and writes have reached this store.
    pub fn calls(&self) -> usize {
        self.lock().calls
    }

    /// How many snippets are stored.
    pub fn len(&self) -> usize {
        self.lock().snippets.len()
    }

    /// Is the store empty?
    pub fn is_empty(&self) -> bool {
        self.lock().snippets.is_empty()
    }

    /// Nothing we do while holding the lock can leave the map half-updated, so
    /// it's fine to keep going after a panic elsewhere.
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Count a call and check whether we're supposed to be failing.
    fn begin(inner: &mut Inner) -> error::Result<()> {
        inner.calls += 1;

        match &inner.outage {
            Some(message) => Err(Error::Unavailable(message.clone())),
            None => Ok(()),
        }
    }
}

impl SnippetStore for MemoryStore {
    async fn write(&self, key: &str, code: &str) -> error::Result<()> {
        let mut inner = self.lock();
        Self::begin(&mut inner)?;

        inner
            .snippets
            .insert(key.to_owned(), Snippet::new(code.to_owned()));

        Ok(())
    }

    async fn read(&self, key: &str) -> error::Result<Lookup> {
        let mut inner = self.lock();
        Self::begin(&mut inner)?;

        Ok(inner.snippets.get(key).cloned().into())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[tokio::test]
    async fn read_missing_is_not_found() {
        let store = MemoryStore::new();

        assert_eq!(store.read("nope").await.unwrap(), Lookup::NotFound);
        assert!(!store.exists("nope").await.unwrap());
    }

    #[tokio::test]
    async fn write_then_read() {
        let store = MemoryStore::new();

        store.write("abc123", "greet();").await.unwrap();

        let found = store.read("abc123").await.unwrap();
        assert_eq!(found.code(), Some("greet();"));
        assert!(store.exists("abc123").await.unwrap());
    }

    #[tokio::test]
    async fn write_overwrites_code_and_timestamp() {
        let store = MemoryStore::new();

        store.write("abc123", "first").await.unwrap();
        let first = store.get("abc123").unwrap();

        store.write("abc123", "second").await.unwrap();
        let second = store.get("abc123").unwrap();

        assert_eq!(second.code, "second");
        assert!(second.created_at >= first.created_at);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn keys_are_exact() {
        let store = MemoryStore::new();

        store.write("abc123", "greet();").await.unwrap();

        assert_eq!(store.read("ABC123").await.unwrap(), Lookup::NotFound);
        assert_eq!(store.read(" abc123").await.unwrap(), Lookup::NotFound);
    }

    #[tokio::test]
    async fn outage_fails_everything() {
        let store = MemoryStore::new();
        store.write("abc123", "greet();").await.unwrap();

        store.set_outage(Some("offline".to_owned()));

        assert!(matches!(
            store.write("abc123", "other").await,
            Err(Error::Unavailable(message)) if message == "offline"
        ));
        assert!(store.read("abc123").await.is_err());
        assert_eq!(store.get("abc123").map(|s| s.code), Some("greet();".to_owned()));

        store.set_outage(None);
        assert!(store.read("abc123").await.is_ok());
    }

    #[tokio::test]
    async fn clones_share_state() {
        let store = MemoryStore::new();
        let other = store.clone();

        store.write("abc123", "greet();").await.unwrap();

        assert!(other.exists("abc123").await.unwrap());
        assert_eq!(other.calls(), 2);
    }
}
