//! simplecrm - a small CRM backend over a document store
//!
//! Layers, outermost first:
//! - `http_server`: axum routes, request binding, response shaping
//! - `schema`: entity definitions and payload validation
//! - `gateway`: entity types mapped onto store collections, statistics
//! - `store`: schemaless document store backends

pub mod cli;
pub mod config;
pub mod gateway;
pub mod http_server;
pub mod observability;
pub mod schema;
pub mod store;
