//! In-memory join of link rows against node rows.
//!
//! Produces the same row shape as the SQL path: one object per link with the
//! `sid`/`src`/`did`/`dst` aliases and the label under `lbl`, in link order.

use crate::error::DataIntegrityError;
use crate::rows::{RowMapping, DEST_ID, DEST_NAME, LABEL, SOURCE_ID, SOURCE_NAME};
use crate::state::Condition;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Table and column names that connect links to nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinSpec {
    pub links_table: String,
    pub links_key: String,
    pub source_field: String,
    pub dest_field: String,
    pub nodes_table: String,
    pub node_key: String,
    pub node_name_field: String,
    pub label_field: Option<String>,
}

impl JoinSpec {
    pub fn mapping(&self) -> RowMapping {
        RowMapping::joined(self.label_field.is_some())
    }
}

/// Key values compare as text so that `3` and `"3"` join.
fn key_text(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.trim().to_string()),
        _ => None,
    }
}

/// Left-join `links` (filtered by `conditions`) to `nodes` for both endpoints.
pub fn join_rows(
    links: &[Value],
    nodes: &[Value],
    spec: &JoinSpec,
    conditions: &[Condition],
) -> Result<Vec<Value>, DataIntegrityError> {
    let mut by_key: HashMap<String, &Map<String, Value>> = HashMap::new();
    for node in nodes {
        let Some(node) = node.as_object() else {
            tracing::warn!(table = spec.nodes_table.as_str(), "skipping non-object node row");
            continue;
        };
        if let Some(key) = node.get(&spec.node_key).and_then(key_text) {
            by_key.entry(key).or_insert(node);
        }
    }

    let mut joined = Vec::new();
    for (i, link) in links.iter().enumerate() {
        let link = link
            .as_object()
            .ok_or(DataIntegrityError::NotAnObject { row: i })?;
        if !conditions.iter().all(|c| c.matches(link)) {
            continue;
        }

        let lookup = |field: &str| {
            link.get(field)
                .and_then(key_text)
                .and_then(|key| by_key.get(&key).copied())
        };
        let project = |node: Option<&Map<String, Value>>, field: &str| {
            node.and_then(|n| n.get(field)).cloned().unwrap_or(Value::Null)
        };

        let source = lookup(&spec.source_field);
        let dest = lookup(&spec.dest_field);

        let mut row = Map::new();
        row.insert(SOURCE_ID.to_string(), project(source, &spec.node_key));
        row.insert(SOURCE_NAME.to_string(), project(source, &spec.node_name_field));
        row.insert(DEST_ID.to_string(), project(dest, &spec.node_key));
        row.insert(DEST_NAME.to_string(), project(dest, &spec.node_name_field));
        if let Some(label) = &spec.label_field {
            row.insert(
                LABEL.to_string(),
                link.get(label).cloned().unwrap_or(Value::Null),
            );
        }
        joined.push(Value::Object(row));
    }

    tracing::debug!(
        links = links.len(),
        nodes = by_key.len(),
        joined = joined.len(),
        "joined link rows"
    );
    Ok(joined)
}
