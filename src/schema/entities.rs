//! CRM entity definitions
//!
//! Each entity pairs a typed struct (used after validation) with a static
//! schema table (used for validation). Enumerations are closed string sets.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::types::{EntitySchema, FieldDef, FieldType};
use super::validator::parse_timestamp_value;

/// A payload type that can be bound from JSON through its schema
pub trait Entity: Serialize + DeserializeOwned {
    const SCHEMA: EntitySchema;
}

/// The five stored entity types, one collection each
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityType {
    Contact,
    Company,
    Deal,
    Activity,
    EmailCampaign,
}

impl EntityType {
    pub const ALL: [EntityType; 5] = [
        EntityType::Contact,
        EntityType::Company,
        EntityType::Deal,
        EntityType::Activity,
        EntityType::EmailCampaign,
    ];

    /// Collection name: the lowercase entity name
    pub fn collection_name(&self) -> &'static str {
        match self {
            EntityType::Contact => "contact",
            EntityType::Company => "company",
            EntityType::Deal => "deal",
            EntityType::Activity => "activity",
            EntityType::EmailCampaign => "emailcampaign",
        }
    }

    /// Maximum documents returned by an unqualified list
    pub fn default_limit(&self) -> Option<usize> {
        match self {
            EntityType::Activity => Some(200),
            _ => None,
        }
    }

    pub fn schema(&self) -> &'static EntitySchema {
        match self {
            EntityType::Contact => &Contact::SCHEMA,
            EntityType::Company => &Company::SCHEMA,
            EntityType::Deal => &Deal::SCHEMA,
            EntityType::Activity => &Activity::SCHEMA,
            EntityType::EmailCampaign => &EmailCampaign::SCHEMA,
        }
    }
}

macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $text:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl $name {
            /// Every accepted wire value, in declaration order
            pub const VALUES: &'static [&'static str] = &[$($text),+];

            /// Every variant, in declaration order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

string_enum! {
    /// Sales funnel position of a contact
    FunnelStage {
        New => "New",
        Contacted => "Contacted",
        Qualified => "Qualified",
        ProposalSent => "Proposal Sent",
        Negotiation => "Negotiation",
        Won => "Won",
        Lost => "Lost",
    }
}

impl Default for FunnelStage {
    fn default() -> Self {
        FunnelStage::New
    }
}

string_enum! {
    /// Pipeline stage of a deal
    DealStage {
        New => "New",
        Contacted => "Contacted",
        ProposalSent => "Proposal Sent",
        Negotiation => "Negotiation",
        Won => "Won",
        Lost => "Lost",
    }
}

impl Default for DealStage {
    fn default() -> Self {
        DealStage::New
    }
}

impl DealStage {
    /// Closed deals no longer count toward the pipeline
    pub fn is_closed(&self) -> bool {
        matches!(self, DealStage::Won | DealStage::Lost)
    }
}

string_enum! {
    /// Entity an activity is attached to
    EntityKind {
        Contact => "contact",
        Deal => "deal",
        Company => "company",
    }
}

string_enum! {
    ActivityType {
        DealUpdate => "deal_update",
        EmailSent => "email_sent",
        StatusChange => "status_change",
        Note => "note",
    }
}

string_enum! {
    /// Targeting rule of an e-mail campaign
    Segment {
        AllContacts => "all_contacts",
        ByTag => "by_tag",
        ByCompany => "by_company",
        FunnelStage => "funnel_stage",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub company_name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Entity for Company {
    const SCHEMA: EntitySchema = EntitySchema {
        name: "company",
        fields: &[
            FieldDef::required("company_name", FieldType::String),
            FieldDef::optional("address", FieldType::String),
            FieldDef::optional("website", FieldType::String),
            FieldDef::optional("notes", FieldType::String),
        ],
    };
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    /// Company identity, not checked for existence
    #[serde(default)]
    pub company_id: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub funnel_stage: FunnelStage,
}

impl Entity for Contact {
    const SCHEMA: EntitySchema = EntitySchema {
        name: "contact",
        fields: &[
            FieldDef::required("first_name", FieldType::String),
            FieldDef::required("last_name", FieldType::String),
            FieldDef::optional("email", FieldType::Email),
            FieldDef::optional("phone", FieldType::String),
            FieldDef::optional("company_id", FieldType::String),
            FieldDef::defaulted("tags", FieldType::StringList),
            FieldDef::optional("source", FieldType::String),
            FieldDef::optional("notes", FieldType::String),
            FieldDef::defaulted("funnel_stage", FieldType::Enum(FunnelStage::VALUES)),
        ],
    };
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deal {
    pub deal_name: String,
    pub value: f64,
    #[serde(default)]
    pub stage: DealStage,
    #[serde(default)]
    pub contact_id: Option<String>,
    #[serde(default)]
    pub company_id: Option<String>,
    /// Free text, never parsed as a date
    #[serde(default)]
    pub deadline: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Entity for Deal {
    const SCHEMA: EntitySchema = EntitySchema {
        name: "deal",
        fields: &[
            FieldDef::required("deal_name", FieldType::String),
            FieldDef::required("value", FieldType::Number),
            FieldDef::defaulted("stage", FieldType::Enum(DealStage::VALUES)),
            FieldDef::optional("contact_id", FieldType::String),
            FieldDef::optional("company_id", FieldType::String),
            FieldDef::optional("deadline", FieldType::String),
            FieldDef::optional("notes", FieldType::String),
        ],
    };
}

/// Timeline entry attached to a contact, deal or company
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub entity_type: EntityKind,
    pub entity_id: String,
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    pub message: String,
    #[serde(default)]
    pub meta: Map<String, Value>,
}

impl Entity for Activity {
    const SCHEMA: EntitySchema = EntitySchema {
        name: "activity",
        fields: &[
            FieldDef::required("entity_type", FieldType::Enum(EntityKind::VALUES)),
            FieldDef::required("entity_id", FieldType::String),
            FieldDef::required("type", FieldType::Enum(ActivityType::VALUES)),
            FieldDef::required("message", FieldType::String),
            FieldDef::defaulted("meta", FieldType::Object),
        ],
    };
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailCampaign {
    pub subject: String,
    pub html: String,
    pub segment: Segment,
    #[serde(default)]
    pub tag: Option<String>,
    #[serde(default)]
    pub company_id: Option<String>,
    #[serde(default)]
    pub funnel_stage: Option<String>,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub scheduled_at: Option<DateTime<Utc>>,
}

impl Entity for EmailCampaign {
    const SCHEMA: EntitySchema = EntitySchema {
        name: "emailcampaign",
        fields: &[
            FieldDef::required("subject", FieldType::String),
            FieldDef::required("html", FieldType::String),
            FieldDef::required("segment", FieldType::Enum(Segment::VALUES)),
            FieldDef::optional("tag", FieldType::String),
            FieldDef::optional("company_id", FieldType::String),
            FieldDef::optional("funnel_stage", FieldType::String),
            FieldDef::optional("scheduled_at", FieldType::Timestamp),
        ],
    };
}

/// Body of the mock e-mail send endpoint. Not stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendEmailRequest {
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
    /// Mailgun, Resend, SendGrid, ...
    #[serde(default)]
    pub provider: Option<String>,
}

impl Entity for SendEmailRequest {
    const SCHEMA: EntitySchema = EntitySchema {
        name: "send_email",
        fields: &[
            FieldDef::required("to", FieldType::StringList),
            FieldDef::required("subject", FieldType::String),
            FieldDef::required("html", FieldType::String),
            FieldDef::optional("provider", FieldType::String),
        ],
    };
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Value> = Option::deserialize(deserializer)?;
    match raw {
        None | Some(Value::Null) => Ok(None),
        Some(v) => parse_timestamp_value(&v)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid date-time {}", v))),
    }
}
