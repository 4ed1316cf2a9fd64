//! SQL support: reading table metadata from DDL and building the joined
//! link query for hosts that fetch rows themselves.

mod dialect;
mod lexer;
mod parser;
mod query;
mod types;

pub use dialect::Dialect;
pub use parser::{parse_catalog, SchemaError};
pub use query::{sanitize_identifier, JoinQuery, SqlParam, SqlQuery};
