//! # Response shaping
//!
//! Stored documents carry their identity under `_id`; clients see it as a
//! string `id`. The rename happens here, at the response boundary only.

use serde::Serialize;
use serde_json::Value;

use crate::store::{Document, ID_FIELD};

/// Body returned by every create endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatedResponse {
    pub id: String,
}

impl CreatedResponse {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// Replace the internal `_id` with a public string `id`.
///
/// Every other field passes through unchanged.
pub fn to_public(mut doc: Document) -> Document {
    if let Some(internal) = doc.remove(ID_FIELD) {
        let id = match internal {
            Value::String(s) => s,
            other => other.to_string(),
        };
        doc.insert("id".to_string(), Value::String(id));
    }
    doc
}

/// Apply `to_public` to a whole result set
pub fn to_public_all(docs: Vec<Document>) -> Vec<Document> {
    docs.into_iter().map(to_public).collect()
}
