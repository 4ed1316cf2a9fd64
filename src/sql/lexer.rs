//! Tokenizer for the DDL subset the schema reader understands.

use super::SchemaError;
use std::iter::Peekable;
use std::str::Chars;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Keywords
    Create,
    Alter,
    Add,
    Table,
    Primary,
    Key,
    Foreign,
    References,
    Constraint,
    Unique,
    Index,
    Check,
    If,

    /// Bare or quoted identifier; quoted ones never become keywords
    Ident(String),
    Str(String),
    Num(String),

    LParen,
    RParen,
    Comma,
    Semicolon,
    Dot,

    Eof,
}

pub struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    current: Option<char>,
    line: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        let mut chars = input.chars().peekable();
        let current = chars.next();
        Self {
            chars,
            current,
            line: 1,
        }
    }

    fn bump(&mut self) {
        if self.current == Some('\n') {
            self.line += 1;
        }
        self.current = self.chars.next();
    }

    fn skip_line(&mut self) {
        while let Some(c) = self.current {
            self.bump();
            if c == '\n' {
                break;
            }
        }
    }

    fn skip_block_comment(&mut self) -> Result<(), SchemaError> {
        let start = self.line;
        // current is '/', next is '*'
        self.bump();
        self.bump();
        loop {
            match self.current {
                Some('*') if self.chars.peek() == Some(&'/') => {
                    self.bump();
                    self.bump();
                    return Ok(());
                }
                Some(_) => self.bump(),
                None => return Err(SchemaError::UnterminatedComment { line: start }),
            }
        }
    }

    /// Reads up to `close`; a doubled `close` is an escaped literal.
    fn read_delimited(&mut self, close: char) -> Result<String, SchemaError> {
        let start = self.line;
        self.bump();
        let mut text = String::new();
        loop {
            match self.current {
                Some(c) if c == close => {
                    self.bump();
                    if self.current == Some(close) {
                        text.push(close);
                        self.bump();
                    } else {
                        return Ok(text);
                    }
                }
                Some('\\') if close == '\'' => {
                    self.bump();
                    if let Some(c) = self.current {
                        text.push(c);
                        self.bump();
                    }
                }
                Some(c) => {
                    text.push(c);
                    self.bump();
                }
                None => return Err(SchemaError::UnterminatedQuote { line: start }),
            }
        }
    }

    fn read_while(&mut self, keep: impl Fn(char) -> bool) -> String {
        let mut text = String::new();
        while let Some(c) = self.current.filter(|c| keep(*c)) {
            text.push(c);
            self.bump();
        }
        text
    }

    fn keyword_or_ident(word: String) -> Token {
        match word.to_uppercase().as_str() {
            "CREATE" => Token::Create,
            "ALTER" => Token::Alter,
            "ADD" => Token::Add,
            "TABLE" => Token::Table,
            "PRIMARY" => Token::Primary,
            "KEY" => Token::Key,
            "FOREIGN" => Token::Foreign,
            "REFERENCES" => Token::References,
            "CONSTRAINT" => Token::Constraint,
            "UNIQUE" => Token::Unique,
            "INDEX" => Token::Index,
            "CHECK" => Token::Check,
            "IF" => Token::If,
            _ => Token::Ident(word),
        }
    }

    pub fn next_token(&mut self) -> Result<Token, SchemaError> {
        loop {
            let Some(c) = self.current else {
                return Ok(Token::Eof);
            };

            let token = match c {
                c if c.is_whitespace() => {
                    self.bump();
                    continue;
                }
                '-' if self.chars.peek() == Some(&'-') => {
                    self.skip_line();
                    continue;
                }
                '#' => {
                    self.skip_line();
                    continue;
                }
                '/' if self.chars.peek() == Some(&'*') => {
                    self.skip_block_comment()?;
                    continue;
                }
                '(' => Token::LParen,
                ')' => Token::RParen,
                ',' => Token::Comma,
                ';' => Token::Semicolon,
                '.' => Token::Dot,
                '"' => return Ok(Token::Ident(self.read_delimited('"')?)),
                '`' => return Ok(Token::Ident(self.read_delimited('`')?)),
                // `[]` is an array suffix, not an empty identifier
                '[' if self.chars.peek() != Some(&']') => {
                    return Ok(Token::Ident(self.read_delimited(']')?));
                }
                '\'' => return Ok(Token::Str(self.read_delimited('\'')?)),
                c if c.is_ascii_digit() => {
                    return Ok(Token::Num(
                        self.read_while(|c| c.is_ascii_digit() || c == '.'),
                    ));
                }
                c if c.is_alphabetic() || c == '_' => {
                    let word = self.read_while(|c| c.is_alphanumeric() || c == '_' || c == '$');
                    return Ok(Self::keyword_or_ident(word));
                }
                _ => {
                    // Operators and casts carry no schema information
                    self.bump();
                    continue;
                }
            };
            self.bump();
            return Ok(token);
        }
    }

    pub fn tokenize(mut self) -> Result<Vec<Token>, SchemaError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token == Token::Eof;
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }
}
