//! SQL dialect detection, identifier quoting and placeholders.

/// SQL dialect variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dialect {
    /// Auto-detect from dump content
    #[default]
    Auto,
    /// Standard SQL
    Generic,
    /// PostgreSQL
    PostgreSQL,
    /// MySQL
    MySQL,
}

impl Dialect {
    /// Parse dialect from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "auto" => Some(Self::Auto),
            "generic" | "sqlite" => Some(Self::Generic),
            "postgres" | "postgresql" | "pg" => Some(Self::PostgreSQL),
            "mysql" | "mariadb" => Some(Self::MySQL),
            _ => None,
        }
    }

    /// Detect dialect from DDL content.
    pub fn detect(content: &str) -> Self {
        let lower = content.to_lowercase();

        if lower.contains("postgresql database dump") || lower.contains("pg_dump") {
            return Self::PostgreSQL;
        }
        if lower.contains("mysql dump") || lower.contains("mysqldump") {
            return Self::MySQL;
        }

        if lower.contains("serial") || lower.contains("timestamptz") || lower.contains("::text") {
            return Self::PostgreSQL;
        }
        if lower.contains("auto_increment") || lower.contains("engine=") || lower.contains('`') {
            return Self::MySQL;
        }

        Self::Generic
    }

    /// Resolve Auto to a concrete dialect.
    pub fn resolve(self, content: &str) -> Self {
        match self {
            Self::Auto => Self::detect(content),
            other => other,
        }
    }

    /// Quote an identifier that has already been sanitised.
    pub fn quote(self, ident: &str) -> String {
        match self {
            Self::MySQL => format!("`{}`", ident),
            _ => format!("\"{}\"", ident),
        }
    }

    /// Placeholder for the `n`th bound parameter, counting from 1.
    pub fn placeholder(self, n: usize) -> String {
        match self {
            Self::PostgreSQL => format!("${}", n),
            _ => "?".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_postgres() {
        let sql = "-- PostgreSQL database dump\nCREATE TABLE users (id SERIAL);";
        assert_eq!(Dialect::detect(sql), Dialect::PostgreSQL);
    }

    #[test]
    fn test_detect_mysql() {
        let sql = "CREATE TABLE `users` (id INT AUTO_INCREMENT);";
        assert_eq!(Dialect::detect(sql), Dialect::MySQL);
    }

    #[test]
    fn test_detect_generic() {
        let sql = "CREATE TABLE users (id INTEGER PRIMARY KEY);";
        assert_eq!(Dialect::detect(sql), Dialect::Generic);
    }

    #[test]
    fn test_quoting_and_placeholders() {
        assert_eq!(Dialect::PostgreSQL.quote("nodes"), "\"nodes\"");
        assert_eq!(Dialect::MySQL.quote("nodes"), "`nodes`");
        assert_eq!(Dialect::PostgreSQL.placeholder(2), "$2");
        assert_eq!(Dialect::Generic.placeholder(2), "?");
    }
}
