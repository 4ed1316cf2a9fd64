//! Joined rows to edge records.

use crate::error::DataIntegrityError;
use crate::model::{EdgeRecord, NodeId, NodeRef};
use serde_json::{Map, Value};

pub const SOURCE_ID: &str = "sid";
pub const SOURCE_NAME: &str = "src";
pub const DEST_ID: &str = "did";
pub const DEST_NAME: &str = "dst";
/// Alias for the label column; distinct from every links field name the
/// endpoint aliases could collide with.
pub const LABEL: &str = "lbl";

/// Column names a joined row uses for each part of an edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowMapping {
    pub source_id: String,
    pub source_name: String,
    pub dest_id: String,
    pub dest_name: String,
    pub label: Option<String>,
}

impl Default for RowMapping {
    fn default() -> Self {
        Self {
            source_id: SOURCE_ID.to_string(),
            source_name: SOURCE_NAME.to_string(),
            dest_id: DEST_ID.to_string(),
            dest_name: DEST_NAME.to_string(),
            label: None,
        }
    }
}

impl RowMapping {
    pub fn with_label(label: Option<String>) -> Self {
        Self {
            label,
            ..Self::default()
        }
    }

    /// Mapping for rows produced by the join or the link query, where the
    /// label, if any, travels under [`LABEL`].
    pub fn joined(has_label: bool) -> Self {
        Self::with_label(has_label.then(|| LABEL.to_string()))
    }
}

/// Convert every row or fail on the first one that would break the diagram.
pub fn edges_from_rows(
    rows: &[Value],
    mapping: &RowMapping,
) -> Result<Vec<EdgeRecord>, DataIntegrityError> {
    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            let row = row
                .as_object()
                .ok_or(DataIntegrityError::NotAnObject { row: i })?;
            edge_from_row(i, row, mapping)
        })
        .collect()
}

pub fn edge_from_row(
    index: usize,
    row: &Map<String, Value>,
    mapping: &RowMapping,
) -> Result<EdgeRecord, DataIntegrityError> {
    let source = NodeRef {
        id: node_id(index, row, &mapping.source_id)?,
        name: node_name(index, row, &mapping.source_name)?,
    };
    let dest = NodeRef {
        id: node_id(index, row, &mapping.dest_id)?,
        name: node_name(index, row, &mapping.dest_name)?,
    };
    let label = mapping
        .label
        .as_deref()
        .and_then(|field| row.get(field))
        .and_then(scalar_text);

    Ok(EdgeRecord {
        source,
        dest,
        label,
    })
}

fn node_id(row: usize, values: &Map<String, Value>, field: &str) -> Result<NodeId, DataIntegrityError> {
    let invalid = |value: &Value| DataIntegrityError::InvalidId {
        row,
        field: field.to_string(),
        value: value.to_string(),
    };
    match values.get(field) {
        None | Some(Value::Null) => Err(DataIntegrityError::MissingKey {
            row,
            field: field.to_string(),
        }),
        Some(v @ Value::Number(n)) => match (n.as_i64(), n.as_u64()) {
            (Some(i), _) => Ok(NodeId::from(i)),
            (None, Some(u)) => Ok(NodeId::from(u)),
            _ => Err(invalid(v)),
        },
        Some(v @ Value::String(s)) => NodeId::new(s.trim()).ok_or_else(|| invalid(v)),
        Some(v) => Err(invalid(v)),
    }
}

fn node_name(row: usize, values: &Map<String, Value>, field: &str) -> Result<String, DataIntegrityError> {
    values
        .get(field)
        .and_then(scalar_text)
        .ok_or_else(|| DataIntegrityError::MissingName {
            row,
            field: field.to_string(),
        })
}

/// Non-blank text for strings, numbers and booleans.
fn scalar_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    (!text.trim().is_empty()).then_some(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rows_to_edges() {
        let rows = vec![
            json!({"sid": 1, "src": "Client", "did": 2, "dst": "LB", "proto": "http"}),
            json!({"sid": "2", "src": "LB", "did": 3, "dst": "Server", "proto": null}),
        ];
        let mapping = RowMapping::with_label(Some("proto".to_string()));
        let edges = edges_from_rows(&rows, &mapping).unwrap();
        assert_eq!(edges.len(), 2);
        assert_eq!(edges[0].source, NodeRef::new(1, "Client"));
        assert_eq!(edges[0].label.as_deref(), Some("http"));
        assert_eq!(edges[1].source.id.as_str(), "2");
        assert_eq!(edges[1].label, None);
    }

    #[test]
    fn test_missing_key() {
        let rows = vec![
            json!({"sid": 1, "src": "A", "did": 2, "dst": "B"}),
            json!({"sid": 1, "src": "A", "did": null, "dst": "B"}),
        ];
        let err = edges_from_rows(&rows, &RowMapping::default()).unwrap_err();
        assert!(matches!(
            err,
            DataIntegrityError::MissingKey { row: 1, ref field } if field == "did"
        ));
    }

    #[test]
    fn test_missing_name() {
        let rows = vec![json!({"sid": 1, "did": 2, "dst": "B"})];
        let err = edges_from_rows(&rows, &RowMapping::default()).unwrap_err();
        assert!(matches!(err, DataIntegrityError::MissingName { row: 0, .. }));
    }

    #[test]
    fn test_invalid_id() {
        let rows = vec![json!({"sid": "1 OR 1=1", "src": "A", "did": 2, "dst": "B"})];
        let err = edges_from_rows(&rows, &RowMapping::default()).unwrap_err();
        assert!(matches!(err, DataIntegrityError::InvalidId { row: 0, .. }));

        let rows = vec![json!({"sid": 1, "src": "A", "did": "x--o", "dst": "B"})];
        let err = edges_from_rows(&rows, &RowMapping::default()).unwrap_err();
        assert!(matches!(
            err,
            DataIntegrityError::InvalidId { row: 0, ref value, .. } if value == "\"x--o\""
        ));

        let rows = vec![json!({"sid": 1.5, "src": "A", "did": 2, "dst": "B"})];
        assert!(edges_from_rows(&rows, &RowMapping::default()).is_err());
    }

    #[test]
    fn test_non_object_row() {
        let rows = vec![json!([1, 2])];
        let err = edges_from_rows(&rows, &RowMapping::default()).unwrap_err();
        assert!(matches!(err, DataIntegrityError::NotAnObject { row: 0 }));
    }
}
