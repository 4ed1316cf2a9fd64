//! Reads table metadata out of CREATE TABLE / ALTER TABLE statements.

use super::dialect::Dialect;
use super::lexer::{Lexer, Token};
use super::types::field_kind;
use crate::schema::{Catalog, FieldKind, FieldMeta, TableMeta};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("Unterminated quote starting on line {line}")]
    UnterminatedQuote { line: usize },
    #[error("Unterminated block comment starting on line {line}")]
    UnterminatedComment { line: usize },
    #[error("Expected {expected}, found {found:?}")]
    Expected { expected: &'static str, found: Token },
    #[error("Unexpected end of input inside table {0}")]
    UnexpectedEof(String),
}

/// Extra words that belong to a multi-word column type.
const TYPE_WORDS: &[&str] = &["varying", "precision", "with", "without", "time", "zone"];

/// Parse a DDL dump into table metadata.
pub fn parse_catalog(input: &str, dialect: Dialect) -> Result<Catalog, SchemaError> {
    let dialect = dialect.resolve(input);
    let tokens = Lexer::new(input).tokenize()?;
    let mut parser = Parser::new(tokens, dialect);
    parser.parse()
}

struct ForeignKey {
    table: String,
    column: String,
    reftable: String,
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    dialect: Dialect,
}

impl Parser {
    fn new(tokens: Vec<Token>, dialect: Dialect) -> Self {
        Self {
            tokens,
            pos: 0,
            dialect,
        }
    }

    fn current(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or(&Token::Eof)
    }

    fn advance(&mut self) {
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
    }

    fn eat(&mut self, token: &Token) -> bool {
        if self.current() == token {
            self.advance();
            true
        } else {
            false
        }
    }

    fn at_word(&self, word: &str) -> bool {
        matches!(self.current(), Token::Ident(s) if s.eq_ignore_ascii_case(word))
    }

    fn ident(&mut self, expected: &'static str) -> Result<String, SchemaError> {
        match self.current().clone() {
            Token::Ident(name) => {
                self.advance();
                Ok(name)
            }
            found => Err(SchemaError::Expected { expected, found }),
        }
    }

    /// `name` or `schema.name`; the schema part is dropped.
    fn table_name(&mut self) -> Result<String, SchemaError> {
        let mut name = self.ident("table name")?;
        while self.eat(&Token::Dot) {
            name = self.ident("table name")?;
        }
        Ok(name)
    }

    fn parse(&mut self) -> Result<Catalog, SchemaError> {
        let mut tables = Vec::new();
        let mut foreign_keys = Vec::new();

        while self.current() != &Token::Eof {
            match self.current() {
                Token::Create => {
                    self.advance();
                    // TEMPORARY, UNLOGGED, ...
                    while matches!(self.current(), Token::Ident(_)) {
                        self.advance();
                    }
                    if self.eat(&Token::Table) {
                        if let Some(table) = self.parse_create_table(&mut foreign_keys)? {
                            tables.push(table);
                        }
                    } else {
                        self.skip_statement();
                    }
                }
                Token::Alter => {
                    self.advance();
                    if self.eat(&Token::Table) {
                        self.parse_alter_table(&mut foreign_keys)?;
                    } else {
                        self.skip_statement();
                    }
                }
                _ => self.skip_statement(),
            }
        }

        for fk in foreign_keys {
            let field = tables
                .iter_mut()
                .find(|t| t.name == fk.table)
                .and_then(|t| t.fields.iter_mut().find(|f| f.name == fk.column));
            if let Some(field) = field {
                field.kind = FieldKind::Key {
                    reftable: fk.reftable,
                };
            }
        }

        Ok(Catalog { tables })
    }

    fn parse_create_table(
        &mut self,
        foreign_keys: &mut Vec<ForeignKey>,
    ) -> Result<Option<TableMeta>, SchemaError> {
        if self.eat(&Token::If) {
            // NOT EXISTS
            while self.at_word("not") || self.at_word("exists") {
                self.advance();
            }
        }
        let name = self.table_name()?;

        // CREATE TABLE ... AS SELECT and friends carry no column list
        if !self.eat(&Token::LParen) {
            self.skip_statement();
            return Ok(None);
        }

        let mut table = TableMeta::new(name, Vec::new());
        let mut primary_key = None;

        loop {
            match self.current() {
                Token::RParen => {
                    self.advance();
                    break;
                }
                Token::Comma => self.advance(),
                Token::Eof => return Err(SchemaError::UnexpectedEof(table.name)),
                Token::Constraint => {
                    self.advance();
                    if matches!(self.current(), Token::Ident(_)) {
                        self.advance();
                    }
                }
                Token::Primary => {
                    self.advance();
                    self.eat(&Token::Key);
                    let columns = self.column_list()?;
                    primary_key = primary_key.or_else(|| columns.into_iter().next());
                }
                Token::Foreign => {
                    self.advance();
                    self.eat(&Token::Key);
                    let column = self.column_list()?.into_iter().next();
                    let reftable = self.references()?;
                    if let (Some(column), Some(reftable)) = (column, reftable) {
                        foreign_keys.push(ForeignKey {
                            table: table.name.clone(),
                            column,
                            reftable,
                        });
                    }
                }
                Token::Unique | Token::Index | Token::Key | Token::Check => {
                    self.skip_item();
                }
                Token::Ident(_) => {
                    let (field, is_pk) = self.parse_column(&table.name)?;
                    if is_pk {
                        primary_key = primary_key.or_else(|| Some(field.name.clone()));
                    }
                    table.fields.push(field);
                }
                _ => self.skip_item(),
            }
        }

        // Table options (ENGINE=..., PARTITION BY ...)
        self.skip_statement();

        if let Some(pk) = primary_key {
            table.primary_key = pk;
        }
        Ok(Some(table))
    }

    /// One column definition. Returns the field and whether it is the primary key.
    fn parse_column(&mut self, table: &str) -> Result<(FieldMeta, bool), SchemaError> {
        let name = self.ident("column name")?;

        let mut raw_type = match self.current().clone() {
            Token::Ident(t) => {
                self.advance();
                t
            }
            found => {
                return Err(SchemaError::Expected {
                    expected: "column type",
                    found,
                });
            }
        };
        while let Token::Ident(word) = self.current().clone() {
            if !TYPE_WORDS.iter().any(|w| word.eq_ignore_ascii_case(w)) {
                break;
            }
            raw_type.push(' ');
            raw_type.push_str(&word);
            self.advance();
        }
        if self.current() == &Token::LParen {
            raw_type.push_str(&self.collect_parenthesized(table)?);
        }

        let mut kind = field_kind(&raw_type, self.dialect);
        let mut is_pk = false;

        loop {
            match self.current() {
                Token::Comma | Token::RParen => break,
                Token::Eof => return Err(SchemaError::UnexpectedEof(table.to_string())),
                Token::Primary => {
                    self.advance();
                    self.eat(&Token::Key);
                    is_pk = true;
                }
                Token::References => {
                    if let Some(reftable) = self.references()? {
                        kind = FieldKind::Key { reftable };
                    }
                }
                Token::LParen => {
                    self.collect_parenthesized(table)?;
                }
                _ => self.advance(),
            }
        }

        Ok((FieldMeta::new(name, kind), is_pk))
    }

    /// `REFERENCES table [(column)]`; returns the referenced table.
    fn references(&mut self) -> Result<Option<String>, SchemaError> {
        if !self.eat(&Token::References) {
            return Ok(None);
        }
        let reftable = self.table_name()?;
        if self.current() == &Token::LParen {
            self.column_list()?;
        }
        Ok(Some(reftable))
    }

    fn column_list(&mut self) -> Result<Vec<String>, SchemaError> {
        let mut columns = Vec::new();
        if !self.eat(&Token::LParen) {
            return Ok(columns);
        }
        loop {
            match self.current().clone() {
                Token::Ident(name) => {
                    columns.push(name);
                    self.advance();
                }
                Token::Comma => self.advance(),
                Token::RParen => {
                    self.advance();
                    return Ok(columns);
                }
                Token::Eof => {
                    return Err(SchemaError::Expected {
                        expected: "')'",
                        found: Token::Eof,
                    });
                }
                _ => self.advance(),
            }
        }
    }

    /// Consumes a balanced `( ... )` group and returns it as compact text.
    fn collect_parenthesized(&mut self, table: &str) -> Result<String, SchemaError> {
        let mut text = String::new();
        let mut depth = 0usize;
        loop {
            match self.current() {
                Token::LParen => {
                    depth += 1;
                    text.push('(');
                }
                Token::RParen => {
                    depth -= 1;
                    text.push(')');
                    if depth == 0 {
                        self.advance();
                        return Ok(text);
                    }
                }
                Token::Num(n) => text.push_str(n),
                Token::Ident(s) => text.push_str(s),
                Token::Comma => text.push(','),
                Token::Eof => return Err(SchemaError::UnexpectedEof(table.to_string())),
                _ => {}
            }
            self.advance();
        }
    }

    /// `ALTER TABLE [ONLY] t ADD [CONSTRAINT c] FOREIGN KEY (col) REFERENCES r`
    fn parse_alter_table(&mut self, foreign_keys: &mut Vec<ForeignKey>) -> Result<(), SchemaError> {
        if self.at_word("only") {
            self.advance();
        }
        let table = self.table_name()?;

        if !self.eat(&Token::Add) {
            self.skip_statement();
            return Ok(());
        }
        if self.eat(&Token::Constraint) && matches!(self.current(), Token::Ident(_)) {
            self.advance();
        }
        if self.eat(&Token::Foreign) {
            self.eat(&Token::Key);
            let column = self.column_list()?.into_iter().next();
            let reftable = self.references()?;
            if let (Some(column), Some(reftable)) = (column, reftable) {
                foreign_keys.push(ForeignKey {
                    table,
                    column,
                    reftable,
                });
            }
        }
        self.skip_statement();
        Ok(())
    }

    /// Skips a table item up to the next top-level comma or closing paren.
    fn skip_item(&mut self) {
        let mut depth = 0usize;
        loop {
            match self.current() {
                Token::LParen => depth += 1,
                Token::RParen if depth == 0 => return,
                Token::RParen => depth -= 1,
                Token::Comma if depth == 0 => return,
                Token::Eof => return,
                _ => {}
            }
            self.advance();
        }
    }

    fn skip_statement(&mut self) {
        while !matches!(self.current(), Token::Semicolon | Token::Eof) {
            self.advance();
        }
        self.eat(&Token::Semicolon);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DDL: &str = r#"
        CREATE TABLE nodes (
            id SERIAL PRIMARY KEY,
            name VARCHAR(120) NOT NULL,
            created_at timestamp with time zone DEFAULT now()
        );
        CREATE TABLE IF NOT EXISTS public.links (
            id INTEGER NOT NULL,
            src INTEGER REFERENCES nodes(id) ON DELETE CASCADE,
            dst INTEGER,
            protocol TEXT,
            weight NUMERIC(8, 2) CHECK (weight > 0),
            CONSTRAINT links_pk PRIMARY KEY (id),
            CONSTRAINT links_dst_fk FOREIGN KEY (dst) REFERENCES nodes (id)
        );
        CREATE INDEX links_src_idx ON links (src);
    "#;

    #[test]
    fn test_parse_tables_and_fields() {
        let catalog = parse_catalog(DDL, Dialect::PostgreSQL).unwrap();
        assert_eq!(catalog.tables.len(), 2);

        let nodes = catalog.table("nodes").unwrap();
        assert_eq!(nodes.primary_key, "id");
        assert_eq!(nodes.field("name").unwrap().kind, FieldKind::Text);
        assert_eq!(nodes.field("created_at").unwrap().kind, FieldKind::Date);

        let links = catalog.table("links").unwrap();
        let names: Vec<_> = links.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["id", "src", "dst", "protocol", "weight"]);
        assert_eq!(links.field("weight").unwrap().kind, FieldKind::Float);
    }

    #[test]
    fn test_inline_and_table_level_foreign_keys() {
        let catalog = parse_catalog(DDL, Dialect::PostgreSQL).unwrap();
        let links = catalog.table("links").unwrap();
        assert_eq!(links.field("src").unwrap().kind.reftable(), Some("nodes"));
        assert_eq!(links.field("dst").unwrap().kind.reftable(), Some("nodes"));
        assert_eq!(links.field("protocol").unwrap().kind.reftable(), None);
    }

    #[test]
    fn test_alter_table_foreign_key() {
        let ddl = r#"
            CREATE TABLE `edges` (
                `id` int NOT NULL AUTO_INCREMENT,
                `a` int,
                `b` int,
                PRIMARY KEY (`id`),
                KEY `a_idx` (`a`)
            ) ENGINE=InnoDB;
            ALTER TABLE `edges` ADD CONSTRAINT `fk_a` FOREIGN KEY (`a`) REFERENCES `points` (`id`);
            ALTER TABLE ONLY edges ADD FOREIGN KEY (b) REFERENCES points;
        "#;
        let catalog = parse_catalog(ddl, Dialect::Auto).unwrap();
        let edges = catalog.table("edges").unwrap();
        assert_eq!(edges.fields.len(), 3);
        assert_eq!(edges.field("a").unwrap().kind.reftable(), Some("points"));
        assert_eq!(edges.field("b").unwrap().kind.reftable(), Some("points"));
    }

    #[test]
    fn test_unbalanced_table_body() {
        let err = parse_catalog("CREATE TABLE t (id INT", Dialect::Generic).unwrap_err();
        assert!(matches!(err, SchemaError::UnexpectedEof(name) if name == "t"));
    }
}
