//! SQLite-backed document store
//!
//! All collections share one table; bodies are stored as JSON text.
//! Filters are evaluated on decoded documents so array membership behaves
//! exactly like the in-memory backend.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection};
use serde_json::Value;

use super::errors::{StoreError, StoreResult};
use super::filter::Filter;
use super::{new_identity, Document, DocumentStore, ID_FIELD};

const SCHEMA_SQL: &str = "
CREATE TABLE IF NOT EXISTS documents (
    seq        INTEGER PRIMARY KEY AUTOINCREMENT,
    collection TEXT NOT NULL,
    doc_id     TEXT NOT NULL UNIQUE,
    body       TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_documents_collection ON documents(collection);
";

/// Single-file document store
pub struct SqliteStore {
    name: String,
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) a database file and initialize its schema
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)
            .map_err(|e| StoreError::unavailable(format!("{}: {}", path.display(), e)))?;

        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("crm")
            .to_string();

        Self::with_connection(name, conn)
    }

    /// A private database that lives as long as the store
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StoreError::unavailable(e.to_string()))?;
        Self::with_connection("memory".to_string(), conn)
    }

    fn with_connection(name: String, conn: Connection) -> StoreResult<Self> {
        conn.execute_batch(SCHEMA_SQL)?;
        Ok(Self {
            name,
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StoreError::LockPoisoned)
    }

    /// Decode every document of a collection in insertion order, handing
    /// each to `visit` until it returns false.
    fn scan<F>(&self, collection: &str, mut visit: F) -> StoreResult<()>
    where
        F: FnMut(Document) -> bool,
    {
        let conn = self.lock()?;
        let mut stmt =
            conn.prepare_cached("SELECT body FROM documents WHERE collection = ?1 ORDER BY seq")?;
        let mut rows = stmt.query(params![collection])?;

        while let Some(row) = rows.next()? {
            let body: String = row.get(0)?;
            let doc = match serde_json::from_str::<Value>(&body)? {
                Value::Object(map) => map,
                _ => continue,
            };
            if !visit(doc) {
                break;
            }
        }
        Ok(())
    }
}

impl DocumentStore for SqliteStore {
    fn name(&self) -> &str {
        &self.name
    }

    fn insert_one(&self, collection: &str, mut document: Document) -> StoreResult<String> {
        let id = new_identity();
        document.insert(ID_FIELD.to_string(), Value::String(id.clone()));
        let body = serde_json::to_string(&document)?;

        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO documents (collection, doc_id, body) VALUES (?1, ?2, ?3)",
            params![collection, id, body],
        )?;

        Ok(id)
    }

    fn find(
        &self,
        collection: &str,
        filter: &Filter,
        limit: Option<usize>,
    ) -> StoreResult<Vec<Document>> {
        let limit = limit.unwrap_or(usize::MAX);
        let mut found = Vec::new();
        if limit == 0 {
            return Ok(found);
        }

        self.scan(collection, |doc| {
            if filter.matches(&doc) {
                found.push(doc);
            }
            found.len() < limit
        })?;

        Ok(found)
    }

    fn count(&self, collection: &str, filter: &Filter) -> StoreResult<u64> {
        if filter.is_empty() {
            let conn = self.lock()?;
            let n: i64 = conn.query_row(
                "SELECT COUNT(*) FROM documents WHERE collection = ?1",
                params![collection],
                |row| row.get(0),
            )?;
            return Ok(n as u64);
        }

        let mut n = 0u64;
        self.scan(collection, |doc| {
            if filter.matches(&doc) {
                n += 1;
            }
            true
        })?;
        Ok(n)
    }

    fn list_collection_names(&self) -> StoreResult<Vec<String>> {
        let conn = self.lock()?;
        let mut stmt =
            conn.prepare_cached("SELECT DISTINCT collection FROM documents ORDER BY collection")?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::FilterExpr;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_insert_and_find() {
        let store = SqliteStore::open_in_memory().unwrap();
        let id = store
            .insert_one("contact", doc(json!({"first_name": "Ada", "tags": ["vip"]})))
            .unwrap();

        let docs = store.find("contact", &Filter::all(), None).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0][ID_FIELD], json!(id));
        assert_eq!(docs[0]["first_name"], "Ada");
    }

    #[test]
    fn test_filter_membership_and_count() {
        let store = SqliteStore::open_in_memory().unwrap();
        store
            .insert_one("contact", doc(json!({"tags": ["vip", "lead"]})))
            .unwrap();
        store
            .insert_one("contact", doc(json!({"tags": ["lead"]})))
            .unwrap();

        let vip = Filter::all().and(FilterExpr::eq("tags", "vip"));
        assert_eq!(store.find("contact", &vip, None).unwrap().len(), 1);
        assert_eq!(store.count("contact", &vip).unwrap(), 1);
        assert_eq!(store.count("contact", &Filter::all()).unwrap(), 2);
    }

    #[test]
    fn test_limit_stops_scan() {
        let store = SqliteStore::open_in_memory().unwrap();
        for i in 0..5 {
            store.insert_one("activity", doc(json!({"n": i}))).unwrap();
        }

        assert_eq!(store.find("activity", &Filter::all(), Some(2)).unwrap().len(), 2);
        assert!(store.find("activity", &Filter::all(), Some(0)).unwrap().is_empty());
    }

    #[test]
    fn test_collection_names() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.insert_one("deal", doc(json!({}))).unwrap();
        store.insert_one("contact", doc(json!({}))).unwrap();
        store.insert_one("deal", doc(json!({}))).unwrap();

        assert_eq!(
            store.list_collection_names().unwrap(),
            vec!["contact".to_string(), "deal".to_string()]
        );
        assert_eq!(store.name(), "memory");
    }
}
