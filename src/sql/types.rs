//! SQL column type to field kind mapping.

use super::Dialect;
use crate::schema::FieldKind;

/// Classify a raw SQL column type. Key-ness comes from REFERENCES, not here.
pub fn field_kind(sql_type: &str, dialect: Dialect) -> FieldKind {
    let lower = sql_type.to_lowercase();
    let base = lower.split('(').next().unwrap_or(&lower).trim();

    // TINYINT(1) is MySQL's boolean
    if dialect == Dialect::MySQL && lower.starts_with("tinyint(1)") {
        return FieldKind::Bool;
    }

    match base {
        "int" | "int2" | "int4" | "int8" | "integer" | "smallint" | "bigint" | "mediumint"
        | "tinyint" | "serial" | "serial4" | "serial8" | "bigserial" | "smallserial" => {
            FieldKind::Integer
        }

        "real" | "float" | "float4" | "float8" | "double" | "double precision" | "decimal"
        | "numeric" => FieldKind::Float,

        "text" | "varchar" | "character varying" | "char" | "character" | "nvarchar"
        | "nchar" | "longtext" | "mediumtext" | "tinytext" | "citext" | "string" => {
            FieldKind::Text
        }

        "boolean" | "bool" => FieldKind::Bool,

        "timestamp" | "timestamptz" | "timestamp with time zone"
        | "timestamp without time zone" | "datetime" | "date" => FieldKind::Date,

        _ => FieldKind::Other {
            name: base.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_postgres_types() {
        assert_eq!(field_kind("SERIAL", Dialect::PostgreSQL), FieldKind::Integer);
        assert_eq!(field_kind("VARCHAR(255)", Dialect::PostgreSQL), FieldKind::Text);
        assert_eq!(field_kind("TIMESTAMPTZ", Dialect::PostgreSQL), FieldKind::Date);
        assert_eq!(
            field_kind("JSONB", Dialect::PostgreSQL),
            FieldKind::Other {
                name: "jsonb".to_string()
            }
        );
    }

    #[test]
    fn test_mysql_types() {
        assert_eq!(field_kind("INT", Dialect::MySQL), FieldKind::Integer);
        assert_eq!(field_kind("TINYINT(1)", Dialect::MySQL), FieldKind::Bool);
        assert_eq!(field_kind("TINYINT(4)", Dialect::MySQL), FieldKind::Integer);
        assert_eq!(field_kind("LONGTEXT", Dialect::MySQL), FieldKind::Text);
    }
}
