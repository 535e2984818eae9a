//! Schema layer for CRM entities
//!
//! Every request body is checked against a declared entity schema before it
//! can reach the document store.
//!
//! # Rules
//!
//! - Required fields must be present and non-null
//! - Optional fields may be absent or null
//! - Defaulted fields may be absent, but not null
//! - Field types match exactly, no coercion
//! - Enumerated fields only accept their declared values
//! - Undeclared fields are ignored
//! - All violations are reported at once

mod entities;
mod errors;
mod types;
mod validator;

pub use entities::{
    Activity, ActivityType, Company, Contact, Deal, DealStage, EmailCampaign, Entity, EntityKind,
    EntityType, FunnelStage, SendEmailRequest, Segment,
};
pub use errors::{SchemaError, SchemaResult, ValidationDetails};
pub use types::{EntitySchema, FieldDef, FieldType, Presence};
pub use validator::{bind, validate};
