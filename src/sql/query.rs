//! Joined link query with sanitised identifiers and bound values.

use super::Dialect;
use crate::error::ConfigError;
use crate::join::JoinSpec;
use crate::rows::{RowMapping, LABEL};
use crate::state::{Condition, FilterValue};
use serde::Serialize;

/// Strip everything outside `[A-Za-z0-9_]`.
pub fn sanitize_identifier(ident: &str) -> Result<String, ConfigError> {
    let clean: String = ident
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();
    if clean.is_empty() {
        return Err(ConfigError::InvalidIdentifier(ident.to_string()));
    }
    Ok(clean)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SqlParam {
    Int(i64),
    Bool(bool),
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SqlQuery {
    pub text: String,
    pub params: Vec<SqlParam>,
    /// Column aliases the result rows carry
    pub mapping: RowMapping,
}

pub struct JoinQuery<'a> {
    spec: &'a JoinSpec,
    dialect: Dialect,
}

impl<'a> JoinQuery<'a> {
    pub fn new(spec: &'a JoinSpec, dialect: Dialect) -> Self {
        // Auto only makes sense when reading a dump
        let dialect = match dialect {
            Dialect::Auto => Dialect::Generic,
            other => other,
        };
        Self { spec, dialect }
    }

    fn ident(&self, name: &str) -> Result<String, ConfigError> {
        Ok(self.dialect.quote(&sanitize_identifier(name)?))
    }

    pub fn build(&self, conditions: &[Condition]) -> Result<SqlQuery, ConfigError> {
        let spec = self.spec;
        let mapping = spec.mapping();
        let label_column = spec
            .label_field
            .as_deref()
            .map(|field| self.ident(field))
            .transpose()?;

        let node_key = self.ident(&spec.node_key)?;
        let node_name = self.ident(&spec.node_name_field)?;
        let nodes = self.ident(&spec.nodes_table)?;

        let mut columns = vec![
            format!("s.{} AS {}", node_key, self.ident(&mapping.source_id)?),
            format!("s.{} AS {}", node_name, self.ident(&mapping.source_name)?),
            format!("d.{} AS {}", node_key, self.ident(&mapping.dest_id)?),
            format!("d.{} AS {}", node_name, self.ident(&mapping.dest_name)?),
        ];
        if let Some(column) = &label_column {
            columns.push(format!("l.{} AS {}", column, self.ident(LABEL)?));
        }

        let mut text = format!(
            "SELECT {}\nFROM {} AS l\nLEFT JOIN {} AS s ON s.{} = l.{}\nLEFT JOIN {} AS d ON d.{} = l.{}",
            columns.join(", "),
            self.ident(&spec.links_table)?,
            nodes,
            node_key,
            self.ident(&spec.source_field)?,
            nodes,
            node_key,
            self.ident(&spec.dest_field)?,
        );

        let mut params = Vec::new();
        let mut predicates = Vec::new();
        for condition in conditions {
            let column = format!("l.{}", self.ident(&condition.field)?);
            let param = match &condition.value {
                FilterValue::Null => {
                    predicates.push(format!("{} IS NULL", column));
                    continue;
                }
                FilterValue::Int(n) => SqlParam::Int(*n),
                FilterValue::Bool(b) => SqlParam::Bool(*b),
                FilterValue::Text(t) => SqlParam::Text(t.clone()),
            };
            params.push(param);
            predicates.push(format!(
                "{} = {}",
                column,
                self.dialect.placeholder(params.len())
            ));
        }
        if !predicates.is_empty() {
            text.push_str("\nWHERE ");
            text.push_str(&predicates.join(" AND "));
        }
        text.push_str(&format!("\nORDER BY l.{}", self.ident(&spec.links_key)?));

        tracing::debug!(sql = text.as_str(), params = params.len(), "built link query");
        Ok(SqlQuery {
            text,
            params,
            mapping,
        })
    }
}
