use std::fmt;

use crate::error::{Error, Result};

/// Lexical unit of a statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // --- SQL Keywords ---
    Select,
    From,
    Where,
    Insert,
    Into,
    Values,
    Update,
    Set,
    Delete,
    Create,
    Table,
    Primary,
    Key,
    Unique,
    Join,
    On,
    And,
    Or,
    Not,
    Null,

    // --- Data Types ---
    Int,
    Text,
    Boolean,

    // --- Identifiers & Literals ---
    /// A name representing a table or a column (e.g., `users`, `id`).
    /// Original case is preserved.
    Ident(String),
    /// A 64-bit integer literal (e.g., `42`).
    Number(i64),
    /// A string literal, between single or double quotes (e.g., `'Alice'`).
    String(String),

    // --- Operators ---
    /// `=`
    Equal,
    /// `==`
    DoubleEqual,
    /// `!=`
    NotEqual,
    /// `>`
    Greater,
    /// `>=`
    GreaterEqual,
    /// `<`
    Lower,
    /// `<=`
    LowerEqual,
    /// `!`
    Bang,

    // --- Punctuation ---
    /// Left parenthesis `(`
    LeftParen,
    /// Right parenthesis `)`
    RightParen,
    /// Comma `,`
    Comma,
    /// Semicolon `;`
    Semicolon,
    /// Wildcard symbol `*`
    Star,
    /// Qualification dot in `table.column`
    Dot,

    // --- Special ---
    /// Represents the End Of File/Input.
    Eof,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keyword = match self {
            Self::Select => "SELECT",
            Self::From => "FROM",
            Self::Where => "WHERE",
            Self::Insert => "INSERT",
            Self::Into => "INTO",
            Self::Values => "VALUES",
            Self::Update => "UPDATE",
            Self::Set => "SET",
            Self::Delete => "DELETE",
            Self::Create => "CREATE",
            Self::Table => "TABLE",
            Self::Primary => "PRIMARY",
            Self::Key => "KEY",
            Self::Unique => "UNIQUE",
            Self::Join => "JOIN",
            Self::On => "ON",
            Self::And => "AND",
            Self::Or => "OR",
            Self::Not => "NOT",
            Self::Null => "NULL",
            Self::Int => "INT",
            Self::Text => "TEXT",
            Self::Boolean => "BOOLEAN",
            Self::Ident(name) => return write!(f, "identifier '{name}'"),
            Self::Number(n) => return write!(f, "number {n}"),
            Self::String(s) => return write!(f, "string '{s}'"),
            Self::Equal => "'='",
            Self::DoubleEqual => "'=='",
            Self::NotEqual => "'!='",
            Self::Greater => "'>'",
            Self::GreaterEqual => "'>='",
            Self::Lower => "'<'",
            Self::LowerEqual => "'<='",
            Self::Bang => "'!'",
            Self::LeftParen => "'('",
            Self::RightParen => "')'",
            Self::Comma => "','",
            Self::Semicolon => "';'",
            Self::Star => "'*'",
            Self::Dot => "'.'",
            Self::Eof => "end of input",
        };
        f.write_str(keyword)
    }
}

/// A [Token] together with the byte offset where it starts in the statement.
#[derive(Debug, Clone, PartialEq)]
pub struct SpannedToken {
    pub token: Token,
    pub offset: usize,
}

/// A lexical scanner (lexer) that converts a raw SQL string into a sequence of [Token]s.
pub struct Tokenizer {
    /// The input string as `(byte offset, char)` pairs for easy iteration.
    input: Vec<(usize, char)>,
    /// Byte length of the input, used as the offset of [Token::Eof].
    end: usize,
    /// The current position in the character vector.
    position: usize,
}

impl Tokenizer {
    /// Creates a new Tokenizer for the given input string.
    pub fn new(input: &str) -> Self {
        Self {
            input: input.char_indices().collect(),
            end: input.len(),
            position: 0,
        }
    }

    /// Processes the entire input and returns a vector of tokens, always
    /// terminated by [Token::Eof].
    ///
    /// # Errors
    /// Returns [Error::Lexical] if an invalid character is encountered or if a
    /// literal (like a string) is malformed.
    ///
    /// # Example
    /// ```
    /// # use quilldb::tokenizer::{Tokenizer, Token};
    /// let mut t = Tokenizer::new("SELECT *");
    /// let tokens = t.tokenize().unwrap();
    /// assert_eq!(tokens[0].token, Token::Select);
    /// assert_eq!(tokens[2].token, Token::Eof);
    /// ```
    pub fn tokenize(&mut self) -> Result<Vec<SpannedToken>> {
        let mut tokens = Vec::new();

        while !self.is_at_end() {
            self.skip_whitespace();

            if self.is_at_end() {
                break;
            }

            let offset = self.offset();
            let token = self.next_token()?;
            tokens.push(SpannedToken { token, offset });
        }

        tokens.push(SpannedToken {
            token: Token::Eof,
            offset: self.end,
        });
        Ok(tokens)
    }

    fn next_token(&mut self) -> Result<Token> {
        let ch = self.current_char();

        let single = match ch {
            '(' => Some(Token::LeftParen),
            ')' => Some(Token::RightParen),
            ',' => Some(Token::Comma),
            ';' => Some(Token::Semicolon),
            '*' => Some(Token::Star),
            '.' => Some(Token::Dot),
            _ => None,
        };
        if let Some(token) = single {
            self.advance();
            return Ok(token);
        }

        match ch {
            '=' | '<' | '>' | '!' => Ok(self.read_operator()),
            c if c.is_ascii_alphabetic() || c == '_' => Ok(self.read_identifier()),
            c if c.is_ascii_digit() => self.read_number(),
            '\'' | '"' => self.read_string(ch),
            _ => Err(Error::Lexical {
                message: format!("unexpected character {ch:?}"),
                offset: self.offset(),
            }),
        }
    }

    fn current_char(&self) -> char {
        self.input[self.position].1
    }

    /// Returns the character after the current one, if any.
    fn peek_char(&self) -> Option<char> {
        self.input.get(self.position + 1).map(|(_, c)| *c)
    }

    /// Byte offset of the current position.
    fn offset(&self) -> usize {
        self.input
            .get(self.position)
            .map(|(offset, _)| *offset)
            .unwrap_or(self.end)
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    fn skip_whitespace(&mut self) {
        while !self.is_at_end() && self.current_char().is_whitespace() {
            self.advance();
        }
    }

    /// Two-character operators are matched before their one-character prefix.
    fn read_operator(&mut self) -> Token {
        let first = self.current_char();
        let two = match (first, self.peek_char()) {
            ('<', Some('=')) => Some(Token::LowerEqual),
            ('>', Some('=')) => Some(Token::GreaterEqual),
            ('!', Some('=')) => Some(Token::NotEqual),
            ('=', Some('=')) => Some(Token::DoubleEqual),
            _ => None,
        };
        if let Some(token) = two {
            self.advance();
            self.advance();
            return token;
        }

        self.advance();
        match first {
            '=' => Token::Equal,
            '<' => Token::Lower,
            '>' => Token::Greater,
            _ => Token::Bang,
        }
    }

    /// Reads a sequence of alphanumeric characters and determines if it's
    /// a reserved SQL keyword or a user-defined identifier.
    ///
    /// Keywords are matched case-insensitively.
    fn read_identifier(&mut self) -> Token {
        let mut ident = String::new();

        while !self.is_at_end()
            && (self.current_char().is_ascii_alphanumeric() || self.current_char() == '_')
        {
            ident.push(self.current_char());
            self.advance();
        }

        match ident.to_ascii_uppercase().as_str() {
            "SELECT" => Token::Select,
            "FROM" => Token::From,
            "WHERE" => Token::Where,
            "INSERT" => Token::Insert,
            "INTO" => Token::Into,
            "VALUES" => Token::Values,
            "UPDATE" => Token::Update,
            "SET" => Token::Set,
            "DELETE" => Token::Delete,
            "CREATE" => Token::Create,
            "TABLE" => Token::Table,
            "PRIMARY" => Token::Primary,
            "KEY" => Token::Key,
            "UNIQUE" => Token::Unique,
            "INT" => Token::Int,
            "TEXT" => Token::Text,
            "BOOLEAN" => Token::Boolean,
            "JOIN" => Token::Join,
            "ON" => Token::On,
            "AND" => Token::And,
            "OR" => Token::Or,
            "NOT" => Token::Not,
            "NULL" => Token::Null,
            _ => Token::Ident(ident),
        }
    }

    /// Reads an integer literal.
    fn read_number(&mut self) -> Result<Token> {
        let offset = self.offset();
        let mut number = String::new();

        while !self.is_at_end() && self.current_char().is_ascii_digit() {
            number.push(self.current_char());
            self.advance();
        }

        number
            .parse::<i64>()
            .map(Token::Number)
            .map_err(|e| Error::Lexical {
                message: format!("invalid integer literal {number}: {e}"),
                offset,
            })
    }

    /// Reads a string literal enclosed in `quote`.
    ///
    /// `\n` and `\t` are unescaped, any other escaped character is kept as is.
    fn read_string(&mut self, quote: char) -> Result<Token> {
        let offset = self.offset();
        self.advance(); // Skip the opening quote

        let mut string = String::new();
        while !self.is_at_end() && self.current_char() != quote {
            let ch = self.current_char();
            self.advance();
            if ch != '\\' {
                string.push(ch);
                continue;
            }
            if self.is_at_end() {
                break;
            }
            match self.current_char() {
                'n' => string.push('\n'),
                't' => string.push('\t'),
                other => string.push(other),
            }
            self.advance();
        }

        if self.is_at_end() {
            return Err(Error::Lexical {
                message: "unterminated string literal".into(),
                offset,
            });
        }

        // Skip the closing quote
        self.advance();

        Ok(Token::String(string))
    }
}
