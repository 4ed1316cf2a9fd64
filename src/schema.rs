//! Table and field metadata consumed from the hosting application.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    /// Foreign key into `reftable`
    Key { reftable: String },
    Integer,
    Float,
    Bool,
    Date,
    Other { name: String },
}

impl FieldKind {
    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text)
    }

    pub fn reftable(&self) -> Option<&str> {
        match self {
            Self::Key { reftable } => Some(reftable),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMeta {
    pub name: String,
    pub kind: FieldKind,
}

impl FieldMeta {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    pub fn key(name: impl Into<String>, reftable: impl Into<String>) -> Self {
        Self::new(
            name,
            FieldKind::Key {
                reftable: reftable.into(),
            },
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableMeta {
    pub name: String,
    pub fields: Vec<FieldMeta>,
    /// Primary key column, `id` unless the schema says otherwise
    #[serde(default = "default_primary_key")]
    pub primary_key: String,
}

fn default_primary_key() -> String {
    "id".to_string()
}

impl TableMeta {
    pub fn new(name: impl Into<String>, fields: Vec<FieldMeta>) -> Self {
        Self {
            name: name.into(),
            fields,
            primary_key: default_primary_key(),
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldMeta> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn key_fields(&self) -> impl Iterator<Item = &FieldMeta> {
        self.fields.iter().filter(|f| f.kind.reftable().is_some())
    }

    /// Key fields pointing at `table`, usable as link endpoints.
    pub fn key_fields_to<'a>(&'a self, table: &'a str) -> impl Iterator<Item = &'a FieldMeta> {
        self.key_fields()
            .filter(move |f| f.kind.reftable() == Some(table))
    }

    pub fn text_fields(&self) -> impl Iterator<Item = &FieldMeta> {
        self.fields.iter().filter(|f| f.kind.is_text())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub tables: Vec<TableMeta>,
}

impl Catalog {
    pub fn table(&self, name: &str) -> Option<&TableMeta> {
        self.tables.iter().find(|t| t.name == name)
    }
}

/// Tables referenced by at least two key fields of `links`, first-seen order.
///
/// Only such tables can serve as the node table: a link needs one key for
/// its source and another for its destination.
pub fn node_table_candidates(links: &TableMeta) -> Vec<&str> {
    let mut candidates: Vec<&str> = Vec::new();
    for field in links.key_fields() {
        let Some(reftable) = field.kind.reftable() else {
            continue;
        };
        if candidates.contains(&reftable) {
            continue;
        }
        if links.key_fields_to(reftable).count() >= 2 {
            candidates.push(reftable);
        }
    }
    candidates
}
