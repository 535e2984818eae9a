//! SQLite Persistence Tests
//!
//! Documents written through the gateway survive reopening the file.

use serde_json::json;
use tempfile::TempDir;

use simplecrm::gateway::{summarize, StorageGateway};
use simplecrm::schema::{Contact, Deal, DealStage, EntityType};
use simplecrm::store::{connect, DocumentStore, Filter, FilterExpr, SqliteStore};

fn contact(first: &str, tags: &[&str]) -> Contact {
    serde_json::from_value(json!({
        "first_name": first,
        "last_name": "Tester",
        "tags": tags,
    }))
    .unwrap()
}

#[test]
fn test_documents_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("crm.db");

    let first_id = {
        let store = SqliteStore::open(&path).unwrap();
        let gateway = StorageGateway::new(std::sync::Arc::new(store));
        let id = gateway
            .create(EntityType::Contact, &contact("Ada", &["vip"]))
            .unwrap();
        gateway
            .create(EntityType::Contact, &contact("Bob", &[]))
            .unwrap();
        id
    };

    let reopened = SqliteStore::open(&path).unwrap();
    assert_eq!(reopened.name(), "crm");

    let docs = reopened.find("contact", &Filter::all(), None).unwrap();
    assert_eq!(docs.len(), 2);
    assert_eq!(docs[0]["_id"], json!(first_id));
    assert_eq!(docs[0]["first_name"], "Ada");
    assert_eq!(docs[1]["first_name"], "Bob");

    let vip = Filter::all().and(FilterExpr::eq("tags", "vip"));
    assert_eq!(reopened.count("contact", &vip).unwrap(), 1);
}

#[test]
fn test_connect_by_url() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("pipeline.sqlite");
    let url = format!("sqlite://{}", path.display());

    let store = connect(&url).unwrap();
    assert_eq!(store.name(), "pipeline");

    let gateway = StorageGateway::new(store);
    for (value, stage) in [(100.0, DealStage::New), (50.0, DealStage::Won), (25.0, DealStage::Negotiation)] {
        let deal = Deal {
            deal_name: "deal".to_string(),
            value,
            stage,
            contact_id: None,
            company_id: None,
            deadline: None,
            notes: None,
        };
        gateway.create(EntityType::Deal, &deal).unwrap();
    }

    let stats = summarize(&gateway, chrono::Utc::now()).unwrap();
    assert_eq!(stats.pipeline_value, 125.0);
    assert_eq!(stats.active_deals, 2);
    assert_eq!(stats.won_deals, 1);

    let collections = gateway.store().unwrap().list_collection_names().unwrap();
    assert_eq!(collections, vec!["deal".to_string()]);
}

#[test]
fn test_unopenable_path_leaves_gateway_unavailable() {
    let dir = TempDir::new().unwrap();
    let url = format!("sqlite://{}", dir.path().join("missing/dir/crm.db").display());

    let gateway = StorageGateway::connect(Some(url.as_str()));
    assert!(!gateway.is_connected());
    assert!(gateway.count(EntityType::Contact, &Filter::all()).is_err());
}
