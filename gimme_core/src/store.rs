/// Things that can go wrong when talking to a store
pub mod error;
pub use error::{Error, Result};

/// A store backed by a Firestore-compatible REST API
pub mod firestore;

/// A store that lives in memory
pub mod memory;
pub use memory::MemoryStore;

use crate::snippet::Lookup;
use std::future::Future;

/// Somewhere we can keep snippets, addressed by reference code.
///
/// Stores don't validate anything about the key or the code beyond what they
/// physically can't address; the playground makes sure neither is blank
/// before it asks. Each call is a single attempt. If it fails, the user is the
/// retry mechanism.
pub trait SnippetStore: Send + Sync {
    /// Write `code` under `key`, stamped with the current time. Anything
    /// already there gets replaced wholesale.
    ///
    /// ## Errors
    ///
    /// Implementation-specific, but always something the user can read.
    fn write(&self, key: &str, code: &str) -> impl Future<Output = Result<()>> + Send;

    /// Read whatever is under `key`.
    ///
    /// ## Errors
    ///
    /// Implementation-specific. Missing snippets are `Lookup::NotFound`, not
    /// an error.
    fn read(&self, key: &str) -> impl Future<Output = Result<Lookup>> + Send;

    /// Check whether anything has been shared under `key`.
    ///
    /// ## Errors
    ///
    /// Same as `read`.
    fn exists(&self, key: &str) -> impl Future<Output = Result<bool>> + Send {
        async move { Ok(self.read(key).await?.is_found()) }
    }
}
