//! # Document store
//!
//! A schemaless store of JSON documents grouped in named collections.
//!
//! Backends:
//! - `memory://[name]` - process-local, lost on exit
//! - `sqlite://<path>` or `sqlite::memory:` - single-file SQLite database
//!
//! Every inserted document gets a store-assigned identity under `_id`.
//! Documents are never updated or removed.

mod errors;
mod filter;
mod memory;
mod sqlite;

use std::sync::Arc;

use serde_json::{Map, Value};
use uuid::Uuid;

pub use errors::{StoreError, StoreResult};
pub use filter::{Filter, FilterExpr, FilterOperator};
pub use memory::InMemoryStore;
pub use sqlite::SqliteStore;

/// A stored document: a JSON object
pub type Document = Map<String, Value>;

/// Key of the store-internal identity field
pub const ID_FIELD: &str = "_id";

/// Operations every document store backend provides
pub trait DocumentStore: Send + Sync {
    /// Database name, reported by diagnostics
    fn name(&self) -> &str;

    /// Insert one document, returning its freshly assigned identity.
    ///
    /// Any `_id` already present in `document` is replaced.
    fn insert_one(&self, collection: &str, document: Document) -> StoreResult<String>;

    /// Documents matching `filter`, at most `limit` of them, in store order
    fn find(
        &self,
        collection: &str,
        filter: &Filter,
        limit: Option<usize>,
    ) -> StoreResult<Vec<Document>>;

    /// Number of documents matching `filter`
    fn count(&self, collection: &str, filter: &Filter) -> StoreResult<u64>;

    /// Names of all collections holding at least one document
    fn list_collection_names(&self) -> StoreResult<Vec<String>>;
}

/// Open a store from a connection string.
///
/// # Errors
///
/// `StoreError::Unavailable` for unknown schemes or when the backend cannot
/// be opened.
pub fn connect(url: &str) -> StoreResult<Arc<dyn DocumentStore>> {
    let url = url.trim();

    if let Some(name) = url.strip_prefix("memory://") {
        let name = if name.is_empty() { "crm" } else { name };
        return Ok(Arc::new(InMemoryStore::new(name)));
    }

    if url == "sqlite::memory:" || url == "sqlite://:memory:" {
        return Ok(Arc::new(SqliteStore::open_in_memory()?));
    }

    if let Some(path) = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))
    {
        if path.is_empty() {
            return Err(StoreError::unavailable("sqlite connection string has no path"));
        }
        return Ok(Arc::new(SqliteStore::open(path)?));
    }

    let scheme = url.split(':').next().unwrap_or_default();
    Err(StoreError::unavailable(format!(
        "unsupported connection string scheme '{}'",
        scheme
    )))
}

/// Mint a new document identity
pub(crate) fn new_identity() -> String {
    Uuid::new_v4().simple().to_string()
}
