//! Request state to filter conditions.
//!
//! The host passes the current page state as a flat map of strings. Keys that
//! name a field of the links table become equality conditions; everything
//! else is ignored.

use crate::error::{Error, Result};
use crate::schema::{FieldKind, TableMeta};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Null,
    Int(i64),
    Bool(bool),
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub field: String,
    pub value: FilterValue,
}

impl Condition {
    /// Evaluate against a fetched row.
    pub fn matches(&self, row: &Map<String, Value>) -> bool {
        let actual = row.get(&self.field).unwrap_or(&Value::Null);
        match (&self.value, actual) {
            (FilterValue::Null, v) => v.is_null(),
            (FilterValue::Int(n), Value::Number(v)) => v.as_i64() == Some(*n),
            (FilterValue::Int(n), Value::String(s)) => s.trim().parse::<i64>() == Ok(*n),
            (FilterValue::Bool(b), Value::Bool(v)) => v == b,
            (FilterValue::Text(t), Value::String(s)) => s == t,
            (FilterValue::Text(t), Value::Number(v)) => v.to_string() == *t,
            _ => false,
        }
    }
}

/// Typed conditions in field-name order.
pub fn read_state(state: &BTreeMap<String, String>, table: &TableMeta) -> Result<Vec<Condition>> {
    let mut conditions = Vec::new();
    for (key, raw) in state {
        let Some(field) = table.field(key) else {
            tracing::debug!(key = key.as_str(), table = table.name.as_str(), "state key is not a field");
            continue;
        };
        let value = match &field.kind {
            FieldKind::Key { .. } if raw == "null" => FilterValue::Null,
            FieldKind::Key { .. } | FieldKind::Integer => {
                FilterValue::Int(raw.trim().parse().map_err(|_| invalid(key, raw))?)
            }
            FieldKind::Bool => match raw.to_lowercase().as_str() {
                "true" | "on" | "1" => FilterValue::Bool(true),
                "false" | "off" | "0" => FilterValue::Bool(false),
                _ => return Err(invalid(key, raw)),
            },
            _ => FilterValue::Text(raw.clone()),
        };
        conditions.push(Condition {
            field: key.clone(),
            value,
        });
    }
    Ok(conditions)
}

fn invalid(field: &str, value: &str) -> Error {
    Error::InvalidFilter {
        field: field.to_string(),
        value: value.to_string(),
    }
}
