//! Payload validation against entity schemas
//!
//! Validation is deterministic, never mutates the payload, and collects every
//! violation instead of stopping at the first one.

use std::sync::OnceLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;
use serde_json::{Map, Value};

use super::entities::Entity;
use super::errors::{SchemaError, SchemaResult, ValidationDetails};
use super::types::{EntitySchema, FieldType, Presence};

/// Validates a JSON payload against a schema.
///
/// # Errors
///
/// Returns `SchemaError::ValidationFailed` listing every field that is
/// missing, null where not allowed, of the wrong type, or outside its
/// enumeration.
pub fn validate(schema: &EntitySchema, payload: &Value) -> SchemaResult<()> {
    let obj = payload.as_object().ok_or_else(|| {
        SchemaError::validation_failed(
            schema.name,
            vec![ValidationDetails::type_mismatch(
                "$root",
                "object",
                json_type_name(payload),
            )],
        )
    })?;

    let details = validate_object(schema, obj);
    if details.is_empty() {
        Ok(())
    } else {
        Err(SchemaError::validation_failed(schema.name, details))
    }
}

/// Validates a payload, then deserializes it into the typed entity with
/// defaults applied.
pub fn bind<T: Entity>(payload: Value) -> SchemaResult<T> {
    validate(&T::SCHEMA, &payload)?;

    serde_json::from_value(payload).map_err(|e| {
        SchemaError::validation_failed(
            T::SCHEMA.name,
            vec![ValidationDetails::new("$root", T::SCHEMA.name, e.to_string())],
        )
    })
}

fn validate_object(schema: &EntitySchema, obj: &Map<String, Value>) -> Vec<ValidationDetails> {
    let mut details = Vec::new();

    for field in schema.fields {
        match obj.get(field.name) {
            None => {
                if field.presence == Presence::Required {
                    details.push(ValidationDetails::missing_field(field.name));
                }
            }
            Some(Value::Null) => {
                if field.presence != Presence::Optional {
                    details.push(ValidationDetails::null_value(field.name));
                }
            }
            Some(value) => validate_value(value, &field.field_type, field.name, &mut details),
        }
    }

    details
}

fn validate_value(
    value: &Value,
    expected: &FieldType,
    path: &str,
    details: &mut Vec<ValidationDetails>,
) {
    match expected {
        FieldType::String => {
            if !value.is_string() {
                details.push(type_error(path, expected, value));
            }
        }
        FieldType::Email => match value.as_str() {
            Some(s) if email_pattern().is_match(s) => {}
            Some(s) => details.push(ValidationDetails::new(
                path,
                expected.type_name(),
                format!("'{}'", s),
            )),
            None => details.push(type_error(path, expected, value)),
        },
        FieldType::Number => {
            if !value.is_number() {
                details.push(type_error(path, expected, value));
            }
        }
        FieldType::StringList => match value.as_array() {
            Some(items) => {
                for (i, item) in items.iter().enumerate() {
                    if !item.is_string() {
                        details.push(type_error(
                            &format!("{}[{}]", path, i),
                            &FieldType::String,
                            item,
                        ));
                    }
                }
            }
            None => details.push(type_error(path, expected, value)),
        },
        FieldType::Object => {
            if !value.is_object() {
                details.push(type_error(path, expected, value));
            }
        }
        FieldType::Timestamp => match value {
            _ if parse_timestamp_value(value).is_some() => {}
            Value::String(s) => details.push(ValidationDetails::new(
                path,
                expected.type_name(),
                format!("'{}'", s),
            )),
            Value::Number(n) => details.push(ValidationDetails::new(
                path,
                expected.type_name(),
                n.to_string(),
            )),
            _ => details.push(type_error(path, expected, value)),
        },
        FieldType::Enum(allowed) => match value.as_str() {
            Some(s) if allowed.contains(&s) => {}
            Some(s) => details.push(ValidationDetails::new(
                path,
                expected.type_name(),
                format!("'{}'", s),
            )),
            None => details.push(type_error(path, expected, value)),
        },
    }
}

const NAIVE_DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parses an RFC 3339 timestamp, a naive ISO-8601 date-time (seconds
/// optional), or a bare date at midnight. Naive values are taken as UTC.
pub(crate) fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Some(naive) = NAIVE_DATE_TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
    {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Parses a timestamp string or a number of seconds since the Unix epoch.
pub(crate) fn parse_timestamp_value(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => parse_timestamp(s),
        Value::Number(n) => {
            let secs = n.as_f64()?;
            if !secs.is_finite() {
                return None;
            }
            let whole = secs.floor();
            let nanos = ((secs - whole) * 1e9).round() as u32;
            DateTime::from_timestamp(whole as i64, nanos.min(999_999_999))
        }
        _ => None,
    }
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is a valid regex")
    })
}

fn type_error(path: &str, expected: &FieldType, value: &Value) -> ValidationDetails {
    ValidationDetails::type_mismatch(path, expected.type_name(), json_type_name(value))
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Contact, Deal, DealStage, FieldDef};
    use serde_json::json;

    const NOTE: EntitySchema = EntitySchema {
        name: "note",
        fields: &[
            FieldDef::required("title", FieldType::String),
            FieldDef::optional("body", FieldType::String),
            FieldDef::defaulted("labels", FieldType::StringList),
            FieldDef::optional("due", FieldType::Timestamp),
        ],
    };

    #[test]
    fn test_valid_payload_passes() {
        let doc = json!({"title": "hello", "body": null, "labels": ["a"]});
        assert!(validate(&NOTE, &doc).is_ok());
    }

    #[test]
    fn test_root_must_be_object() {
        let err = validate(&NOTE, &json!([1, 2])).unwrap_err();
        assert_eq!(err.fields(), vec!["$root"]);
    }

    #[test]
    fn test_collects_all_violations() {
        let doc = json!({"body": 3, "labels": null});
        let err = validate(&NOTE, &doc).unwrap_err();
        assert_eq!(err.fields(), vec!["title", "body", "labels"]);
    }

    #[test]
    fn test_array_elements_are_checked() {
        let doc = json!({"title": "t", "labels": ["ok", 7]});
        let err = validate(&NOTE, &doc).unwrap_err();
        assert_eq!(err.fields(), vec!["labels[1]"]);
    }

    #[test]
    fn test_no_type_coercion() {
        let doc = json!({"title": 42});
        let err = validate(&NOTE, &doc).unwrap_err();
        assert_eq!(err.details()[0].actual, "number");
    }

    #[test]
    fn test_timestamp_formats() {
        assert!(parse_timestamp("2024-05-01T10:00:00Z").is_some());
        assert!(parse_timestamp("2024-05-01T10:00:00+02:00").is_some());
        assert!(parse_timestamp("2024-05-01T10:00:00.250").is_some());
        assert!(parse_timestamp("next tuesday").is_none());

        let minutes = parse_timestamp("2025-04-01T08:00").unwrap();
        assert_eq!(minutes.to_rfc3339(), "2025-04-01T08:00:00+00:00");
        assert!(parse_timestamp("2025-04-01 08:00").is_some());

        let date_only = parse_timestamp("2025-04-01").unwrap();
        assert_eq!(date_only.to_rfc3339(), "2025-04-01T00:00:00+00:00");
        assert!(parse_timestamp("2025-13-01").is_none());

        let epoch = parse_timestamp_value(&json!(1735689600)).unwrap();
        assert_eq!(epoch.to_rfc3339(), "2025-01-01T00:00:00+00:00");
        let fractional = parse_timestamp_value(&json!(1735689600.5)).unwrap();
        assert_eq!(fractional.timestamp_subsec_millis(), 500);
        assert!(parse_timestamp_value(&json!(true)).is_none());

        assert!(validate(&NOTE, &json!({"title": "t", "due": "2025-04-01T08:00"})).is_ok());
        assert!(validate(&NOTE, &json!({"title": "t", "due": 1735689600})).is_ok());
        let err = validate(&NOTE, &json!({"title": "t", "due": [1]})).unwrap_err();
        assert_eq!(err.details()[0].actual, "array");

        let err = validate(&NOTE, &json!({"title": "t", "due": "soon"})).unwrap_err();
        assert_eq!(err.fields(), vec!["due"]);
    }

    #[test]
    fn test_undeclared_fields_are_ignored() {
        let doc = json!({"title": "t", "colour": "blue"});
        assert!(validate(&NOTE, &doc).is_ok());
    }

    #[test]
    fn test_email_shape() {
        let good = json!({"first_name": "A", "last_name": "B", "email": "a@example.com"});
        assert!(validate(&Contact::SCHEMA, &good).is_ok());

        let bad = json!({"first_name": "A", "last_name": "B", "email": "not-an-address"});
        let err = validate(&Contact::SCHEMA, &bad).unwrap_err();
        assert_eq!(err.fields(), vec!["email"]);
    }

    #[test]
    fn test_enum_rejects_unknown_value() {
        let doc = json!({"deal_name": "x", "value": 1, "stage": "Qualified"});
        let err = validate(&Deal::SCHEMA, &doc).unwrap_err();
        assert_eq!(err.fields(), vec!["stage"]);
        assert!(err.details()[0].expected.contains("'Proposal Sent'"));
    }

    #[test]
    fn test_bind_applies_defaults() {
        let deal: Deal = bind(json!({"deal_name": "x", "value": 10})).unwrap();
        assert_eq!(deal.stage, DealStage::New);
        assert!(deal.notes.is_none());
    }
}
