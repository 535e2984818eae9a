//! Declarative field definitions
//!
//! Schemas are static tables, built once at compile time.

/// Supported field types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// UTF-8 string
    String,
    /// String shaped like an e-mail address
    Email,
    /// Any JSON number (integers are accepted as numbers)
    Number,
    /// Array of strings
    StringList,
    /// Free-form JSON object with string keys
    Object,
    /// RFC 3339 or naive ISO-8601 date-time string, or Unix epoch seconds
    Timestamp,
    /// String from a closed set of values
    Enum(&'static [&'static str]),
}

impl FieldType {
    /// Returns the type name for error messages
    pub fn type_name(&self) -> String {
        match self {
            FieldType::String => "string".to_string(),
            FieldType::Email => "email address".to_string(),
            FieldType::Number => "number".to_string(),
            FieldType::StringList => "array of strings".to_string(),
            FieldType::Object => "object".to_string(),
            FieldType::Timestamp => "date-time string or epoch seconds".to_string(),
            FieldType::Enum(values) => {
                let quoted: Vec<String> = values.iter().map(|v| format!("'{}'", v)).collect();
                format!("one of {}", quoted.join(", "))
            }
        }
    }
}

/// How a field may appear in a payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// Must be present and non-null
    Required,
    /// May be absent or null
    Optional,
    /// May be absent (a default applies) but not null
    Defaulted,
}

/// A single declared field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    pub name: &'static str,
    pub field_type: FieldType,
    pub presence: Presence,
}

impl FieldDef {
    pub const fn required(name: &'static str, field_type: FieldType) -> Self {
        Self {
            name,
            field_type,
            presence: Presence::Required,
        }
    }

    pub const fn optional(name: &'static str, field_type: FieldType) -> Self {
        Self {
            name,
            field_type,
            presence: Presence::Optional,
        }
    }

    pub const fn defaulted(name: &'static str, field_type: FieldType) -> Self {
        Self {
            name,
            field_type,
            presence: Presence::Defaulted,
        }
    }
}

/// The declared shape of one entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntitySchema {
    /// Schema name, used in error messages
    pub name: &'static str,
    pub fields: &'static [FieldDef],
}

impl EntitySchema {
    /// Look up a declared field by name
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Names of all fields that must be supplied
    pub fn required_fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields
            .iter()
            .filter(|f| f.presence == Presence::Required)
            .map(|f| f.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: EntitySchema = EntitySchema {
        name: "sample",
        fields: &[
            FieldDef::required("title", FieldType::String),
            FieldDef::optional("note", FieldType::String),
            FieldDef::defaulted("kind", FieldType::Enum(&["a", "b"])),
        ],
    };

    #[test]
    fn test_field_lookup() {
        assert_eq!(SAMPLE.field("note").unwrap().presence, Presence::Optional);
        assert!(SAMPLE.field("missing").is_none());
    }

    #[test]
    fn test_required_fields() {
        let required: Vec<_> = SAMPLE.required_fields().collect();
        assert_eq!(required, vec!["title"]);
    }

    #[test]
    fn test_enum_type_name_lists_values() {
        assert_eq!(
            FieldType::Enum(&["a", "b"]).type_name(),
            "one of 'a', 'b'"
        );
    }
}
