//! # Storage gateway
//!
//! Maps entity types onto document-store collections. The store handle is
//! opened once at startup; a gateway that failed to connect stays
//! unavailable for its whole life and every operation reports
//! `StoreError::Unavailable`.

mod stats;

use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::observability::{Event, Logger};
use crate::schema::EntityType;
use crate::store::{self, Document, DocumentStore, Filter, StoreError, StoreResult};

pub use stats::{summarize, SummaryStats, RECENT_WINDOW_DAYS};

/// Creation timestamp stamped on every document
pub const CREATED_AT_FIELD: &str = "created_at";
/// Last-write timestamp; equal to `created_at` since documents never change
pub const UPDATED_AT_FIELD: &str = "updated_at";

/// Entry point from the API layer to the document store
#[derive(Clone)]
pub struct StorageGateway {
    store: Option<Arc<dyn DocumentStore>>,
    unavailable_reason: String,
}

impl StorageGateway {
    /// Gateway over an already opened store
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store: Some(store),
            unavailable_reason: String::new(),
        }
    }

    /// Gateway with no store behind it
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            store: None,
            unavailable_reason: reason.into(),
        }
    }

    /// Open the store named by `url`. Failures are logged and produce an
    /// unavailable gateway rather than an error.
    pub fn connect(url: Option<&str>) -> Self {
        let url = match url {
            Some(u) if !u.trim().is_empty() => u,
            _ => {
                Logger::warn(
                    Event::StoreUnavailable.as_str(),
                    &[("reason", "no connection string configured")],
                );
                return Self::unavailable("no connection string configured");
            }
        };

        match store::connect(url) {
            Ok(store) => {
                Logger::info(
                    Event::StoreConnected.as_str(),
                    &[("database", store.name())],
                );
                Self::new(store)
            }
            Err(e) => {
                let reason = e.to_string();
                Logger::error(Event::StoreUnavailable.as_str(), &[("reason", reason.as_str())]);
                Self::unavailable(reason)
            }
        }
    }

    pub fn is_connected(&self) -> bool {
        self.store.is_some()
    }

    /// The underlying store, or `Unavailable`
    pub fn store(&self) -> StoreResult<&Arc<dyn DocumentStore>> {
        self.store
            .as_ref()
            .ok_or_else(|| StoreError::unavailable(self.unavailable_reason.clone()))
    }

    /// Insert a validated payload into the entity's collection.
    ///
    /// Returns the store-assigned identity.
    pub fn create<T: Serialize>(&self, entity_type: EntityType, payload: &T) -> StoreResult<String> {
        let store = self.store()?;

        let mut document = match serde_json::to_value(payload)? {
            Value::Object(map) => map,
            other => {
                return Err(StoreError::Serialization(serde::ser::Error::custom(format!(
                    "payload for {} must serialize to an object, got {}",
                    entity_type.collection_name(),
                    other
                ))))
            }
        };
        stamp_timestamps(&mut document);

        let collection = entity_type.collection_name();
        let id = store.insert_one(collection, document)?;

        Logger::info(
            Event::DocumentCreated.as_str(),
            &[("collection", collection), ("id", id.as_str())],
        );
        Ok(id)
    }

    /// Documents of the entity's collection matching `filter`.
    ///
    /// The effective limit is the smaller of `limit` and the entity's own cap.
    pub fn list(
        &self,
        entity_type: EntityType,
        filter: &Filter,
        limit: Option<usize>,
    ) -> StoreResult<Vec<Document>> {
        let limit = match (limit, entity_type.default_limit()) {
            (Some(requested), Some(cap)) => Some(requested.min(cap)),
            (requested, cap) => requested.or(cap),
        };
        self.store()?
            .find(entity_type.collection_name(), filter, limit)
    }

    pub fn count(&self, entity_type: EntityType, filter: &Filter) -> StoreResult<u64> {
        self.store()?.count(entity_type.collection_name(), filter)
    }
}

fn stamp_timestamps(document: &mut Document) {
    let now = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
    document.insert(CREATED_AT_FIELD.to_string(), Value::String(now.clone()));
    document.insert(UPDATED_AT_FIELD.to_string(), Value::String(now));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Company, Contact, FunnelStage};
    use crate::store::{FilterExpr, InMemoryStore, ID_FIELD};

    fn gateway() -> StorageGateway {
        StorageGateway::new(Arc::new(InMemoryStore::default()))
    }

    fn contact(first: &str, tags: &[&str]) -> Contact {
        Contact {
            first_name: first.to_string(),
            last_name: "Doe".to_string(),
            email: None,
            phone: None,
            company_id: None,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            source: None,
            notes: None,
            funnel_stage: FunnelStage::New,
        }
    }

    #[test]
    fn test_create_then_list() {
        let gw = gateway();
        let id = gw.create(EntityType::Contact, &contact("Jane", &[])).unwrap();

        let docs = gw.list(EntityType::Contact, &Filter::all(), None).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0][ID_FIELD], Value::String(id));
        assert_eq!(docs[0]["first_name"], "Jane");
        assert!(docs[0][CREATED_AT_FIELD].is_string());
        assert_eq!(docs[0][CREATED_AT_FIELD], docs[0][UPDATED_AT_FIELD]);
    }

    #[test]
    fn test_list_uses_entity_collection() {
        let gw = gateway();
        gw.create(
            EntityType::Company,
            &Company {
                company_name: "Acme".to_string(),
                address: None,
                website: None,
                notes: None,
            },
        )
        .unwrap();

        assert!(gw.list(EntityType::Contact, &Filter::all(), None).unwrap().is_empty());
        assert_eq!(gw.count(EntityType::Company, &Filter::all()).unwrap(), 1);
        let names = gw.store().unwrap().list_collection_names().unwrap();
        assert_eq!(names, vec!["company".to_string()]);
    }

    #[test]
    fn test_tag_membership_filter() {
        let gw = gateway();
        gw.create(EntityType::Contact, &contact("A", &["vip", "lead"])).unwrap();
        gw.create(EntityType::Contact, &contact("B", &["lead"])).unwrap();

        let vip = Filter::all().and(FilterExpr::eq("tags", "vip"));
        let docs = gw.list(EntityType::Contact, &vip, None).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0]["first_name"], "A");
    }

    #[test]
    fn test_activity_cap_applies_to_requested_limit() {
        let gw = gateway();
        let store = gw.store().unwrap().clone();
        for _ in 0..205 {
            store.insert_one("activity", Document::new()).unwrap();
        }

        assert_eq!(gw.list(EntityType::Activity, &Filter::all(), None).unwrap().len(), 200);
        assert_eq!(
            gw.list(EntityType::Activity, &Filter::all(), Some(1000)).unwrap().len(),
            200
        );
        assert_eq!(gw.list(EntityType::Activity, &Filter::all(), Some(5)).unwrap().len(), 5);
    }

    #[test]
    fn test_unavailable_gateway() {
        let gw = StorageGateway::unavailable("no connection string configured");
        assert!(!gw.is_connected());

        let err = gw.create(EntityType::Contact, &contact("A", &[])).unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));
        assert!(gw.list(EntityType::Deal, &Filter::all(), None).is_err());
        assert!(gw.count(EntityType::Deal, &Filter::all()).is_err());
    }

    #[test]
    fn test_connect_without_url_is_unavailable() {
        assert!(!StorageGateway::connect(None).is_connected());
        assert!(!StorageGateway::connect(Some("  ")).is_connected());
        assert!(!StorageGateway::connect(Some("ftp://nowhere")).is_connected());
        assert!(StorageGateway::connect(Some("memory://")).is_connected());
    }
}
