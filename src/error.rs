//! Error types shared by the renderer, the configuration layer and the
//! data-access helpers.

use crate::sql::SchemaError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error("Data integrity error: {0}")]
    DataIntegrity(#[from] DataIntegrityError),

    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("Invalid filter value for {field}: {value:?}")]
    InvalidFilter { field: String, value: String },

    #[error("Invalid row data: {0}")]
    Json(#[from] serde_json::Error),
}

/// A view configuration that cannot be rendered.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Unknown {kind} {token:?}")]
    UnknownStyle { kind: &'static str, token: String },

    #[error("Missing required setting {0}")]
    MissingSetting(&'static str),

    #[error("Table {0} does not exist")]
    MissingTable(String),

    #[error("Field {field} does not exist in table {table}")]
    MissingField { table: String, field: String },

    #[error("Field {field} in table {table} must be {expected}")]
    FieldKind {
        table: String,
        field: String,
        expected: &'static str,
    },

    #[error("Source and destination fields are both {0}")]
    SameEndpoints(String),

    #[error("Identifier {0:?} has no usable characters")]
    InvalidIdentifier(String),

    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Failed to parse JSON config: {0}")]
    Json(#[from] serde_json::Error),
}

/// A fetched row that would produce broken diagram text.
#[derive(Debug, thiserror::Error)]
pub enum DataIntegrityError {
    #[error("Row {row}: missing key field {field}")]
    MissingKey { row: usize, field: String },

    #[error("Row {row}: missing name field {field}")]
    MissingName { row: usize, field: String },

    #[error("Row {row}: invalid node id {value} in {field}")]
    InvalidId {
        row: usize,
        field: String,
        value: String,
    },

    #[error("Row {row} is not an object")]
    NotAnObject { row: usize },
}
