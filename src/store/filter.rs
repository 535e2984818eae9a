//! # Filter expressions
//!
//! Conditions over top-level document fields, combined with AND.
//!
//! Array-valued fields use membership semantics: `{"tags": ["a", "b"]}`
//! matches `eq("tags", "a")`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Document;

/// Filter operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterOperator {
    /// Equals, or contains for array fields
    #[serde(rename = "eq")]
    Eq,

    /// Not one of a list of values. A missing field matches.
    #[serde(rename = "nin")]
    NotIn,
}

impl FilterOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOperator::Eq => "eq",
            FilterOperator::NotIn => "nin",
        }
    }
}

/// A single condition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterExpr {
    /// Field to filter on
    pub field: String,

    /// Comparison operator
    pub operator: FilterOperator,

    /// Value to compare against (an array for `NotIn`)
    pub value: Value,
}

impl FilterExpr {
    pub fn new(field: impl Into<String>, operator: FilterOperator, value: Value) -> Self {
        Self {
            field: field.into(),
            operator,
            value,
        }
    }

    /// Create an equality filter
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, FilterOperator::Eq, value.into())
    }

    /// Create a "not in list" filter
    pub fn not_in(field: impl Into<String>, values: Vec<Value>) -> Self {
        Self::new(field, FilterOperator::NotIn, Value::Array(values))
    }

    /// Check if a document matches this condition
    pub fn matches(&self, doc: &Document) -> bool {
        let field_value = doc.get(&self.field);

        match self.operator {
            FilterOperator::Eq => match field_value {
                None => false,
                Some(Value::Array(items)) => {
                    items.contains(&self.value) || field_value == Some(&self.value)
                }
                Some(v) => v == &self.value,
            },
            FilterOperator::NotIn => {
                let excluded = match self.value.as_array() {
                    Some(list) => list,
                    None => return true,
                };
                match field_value {
                    None => true,
                    Some(Value::Array(items)) => {
                        !excluded.contains(&Value::Array(items.clone()))
                            && !items.iter().any(|item| excluded.contains(item))
                    }
                    Some(v) => !excluded.contains(v),
                }
            }
        }
    }
}

/// A set of conditions combined with AND. Empty matches everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    pub exprs: Vec<FilterExpr>,
}

impl Filter {
    /// The empty filter
    pub fn all() -> Self {
        Self::default()
    }

    pub fn and(mut self, expr: FilterExpr) -> Self {
        self.exprs.push(expr);
        self
    }

    /// Add an equality condition when `value` is present and non-empty
    pub fn and_eq_opt(self, field: &str, value: Option<&str>) -> Self {
        match value {
            Some(v) if !v.is_empty() => self.and(FilterExpr::eq(field, v)),
            _ => self,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.exprs.is_empty()
    }

    /// Check if a document matches all conditions
    pub fn matches(&self, doc: &Document) -> bool {
        self.exprs.iter().all(|e| e.matches(doc))
    }
}
