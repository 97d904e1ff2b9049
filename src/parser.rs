use crate::DataType;
use crate::ast::*;
use crate::error::{Error, Result};
use crate::tokenizer::{SpannedToken, Token};
use crate::value::Value;

/// Recursive-descent parser over the output of the tokenizer.
///
/// The first keyword selects the production; there is no backtracking
/// across statement kinds.
pub struct Parser {
    tokens: Vec<SpannedToken>,
    position: usize,
}

impl Parser {
    /// `tokens` must end with [Token::Eof], as produced by the tokenizer.
    pub fn new(tokens: Vec<SpannedToken>) -> Self {
        Self {
            tokens,
            position: 0,
        }
    }

    pub fn parse(&mut self) -> Result<Statement> {
        let statement = match self.current_token() {
            Token::Create => self.parse_create_table(),
            Token::Select => self.parse_select(),
            Token::Insert => self.parse_insert(),
            Token::Update => self.parse_update(),
            Token::Delete => self.parse_delete(),
            _ => Err(self.unexpected("CREATE, SELECT, INSERT, UPDATE or DELETE")),
        }?;

        // semicolon is optional so skip it
        if matches!(self.current_token(), Token::Semicolon) {
            self.advance();
        }

        // Check we are at the end of the statement
        if !self.is_at_end() {
            return Err(self.unexpected("end of statement"));
        }

        Ok(statement)
    }

    //helpers
    fn current_token(&self) -> &Token {
        &self.tokens[self.position].token
    }

    fn current_offset(&self) -> usize {
        self.tokens[self.position].offset
    }

    fn advance(&mut self) {
        if self.position < self.tokens.len() - 1 {
            self.position += 1;
        }
    }

    fn is_at_end(&self) -> bool {
        matches!(self.current_token(), Token::Eof)
    }

    /// Builds a parse error describing what was expected at the current token.
    fn unexpected(&self, expected: impl Into<String>) -> Error {
        Error::Parse {
            expected: expected.into(),
            found: self.current_token().to_string(),
            offset: self.current_offset(),
        }
    }

    fn consume(&mut self, expected: Token) -> Result<()> {
        if *self.current_token() == expected {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected(expected.to_string()))
        }
    }

    fn consume_ident(&mut self) -> Result<String> {
        match self.current_token() {
            Token::Ident(string) => {
                let string = string.clone(); // Get the name
                self.advance();
                Ok(string)
            }
            _ => Err(self.unexpected("identifier")),
        }
    }

    fn consume_data_type(&mut self, column: &str) -> Result<DataType> {
        let data_type = match self.current_token() {
            Token::Int => DataType::Int,
            Token::Text => DataType::Text,
            Token::Boolean => DataType::Boolean,
            Token::Ident(other) => {
                return Err(Error::Schema(format!(
                    "invalid type {other:?} for column {column:?}"
                )));
            }
            _ => return Err(self.unexpected("column type")),
        };
        self.advance();
        Ok(data_type)
    }

    /// Parses a comma separated list, `item` being called for each element.
    fn comma_separated<T>(&mut self, mut item: impl FnMut(&mut Self) -> Result<T>) -> Result<Vec<T>> {
        let mut items = vec![item(self)?];
        while matches!(self.current_token(), Token::Comma) {
            self.advance();
            items.push(item(self)?);
        }
        Ok(items)
    }

    fn parse_column_spec(&mut self) -> Result<ColumnSpec> {
        let name = self.consume_ident()?;
        let data_type = self.consume_data_type(&name)?;

        let mut constraints = Vec::new();
        while matches!(
            self.current_token(),
            Token::Primary | Token::Key | Token::Unique
        ) {
            constraints.push(self.current_token().to_string());
            self.advance();
        }

        Ok(ColumnSpec {
            name,
            data_type,
            constraints,
        })
    }

    fn parse_create_table(&mut self) -> Result<Statement> {
        self.consume(Token::Create)?; // advance if CREATE
        self.consume(Token::Table)?; // advance if TABLE
        let name = self.consume_ident()?;
        self.consume(Token::LeftParen)?;
        let columns = self.comma_separated(Self::parse_column_spec)?;
        self.consume(Token::RightParen)?;
        Ok(Statement::CreateTable(CreateTable { name, columns }))
    }

    /// `ident` or `ident.ident`
    fn parse_column_ref(&mut self) -> Result<ColumnRef> {
        let first = self.consume_ident()?;
        if !matches!(self.current_token(), Token::Dot) {
            return Ok(ColumnRef::new(first));
        }
        self.advance();
        let column = self.consume_ident()?;
        Ok(ColumnRef::qualified(first, column))
    }

    fn parse_comparison_op(&mut self) -> Result<ComparisonOp> {
        let op = match self.current_token() {
            Token::Equal | Token::DoubleEqual => ComparisonOp::Eq,
            Token::NotEqual => ComparisonOp::NotEq,
            Token::Greater => ComparisonOp::Gt,
            Token::GreaterEqual => ComparisonOp::GtEq,
            Token::Lower => ComparisonOp::Lt,
            Token::LowerEqual => ComparisonOp::LtEq,
            _ => return Err(self.unexpected("comparison operator")),
        };
        self.advance();
        Ok(op)
    }

    fn parse_literal(&mut self) -> Result<Value> {
        let value = match self.current_token() {
            Token::Number(n) => Value::Int(*n),
            Token::String(s) => Value::Text(s.as_str().into()),
            Token::Null => Value::Null,
            _ => return Err(self.unexpected("literal")),
        };
        self.advance();
        Ok(value)
    }

    fn parse_condition(&mut self) -> Result<Condition> {
        let column = self.parse_column_ref()?;
        let op = self.parse_comparison_op()?;
        let value = self.parse_literal()?;
        Ok(Condition { column, op, value })
    }

    fn parse_where(&mut self) -> Result<Option<Condition>> {
        if !matches!(self.current_token(), Token::Where) {
            return Ok(None);
        }
        self.advance();
        self.parse_condition().map(Some)
    }

    fn parse_join(&mut self) -> Result<Option<JoinClause>> {
        if !matches!(self.current_token(), Token::Join) {
            return Ok(None);
        }
        self.advance();
        let table = self.consume_ident()?;
        self.consume(Token::On)?;
        let left = self.parse_column_ref()?;
        match self.current_token() {
            Token::Equal | Token::DoubleEqual => self.advance(),
            _ => return Err(self.unexpected("'='")),
        }
        let right = self.parse_column_ref()?;
        Ok(Some(JoinClause { table, left, right }))
    }

    fn parse_select(&mut self) -> Result<Statement> {
        self.consume(Token::Select)?;

        let columns = if matches!(self.current_token(), Token::Star) {
            self.advance();
            ColumnsSelect::Star
        } else {
            ColumnsSelect::ColumnsNames(self.comma_separated(Self::parse_column_ref)?)
        };

        self.consume(Token::From)?;
        let table = self.consume_ident()?;
        let join = self.parse_join()?;
        let where_clause = self.parse_where()?;

        Ok(Statement::Select(Select {
            columns,
            table,
            join,
            where_clause,
        }))
    }

    fn parse_insert(&mut self) -> Result<Statement> {
        self.consume(Token::Insert)?;
        self.consume(Token::Into)?;
        let table = self.consume_ident()?;

        let columns = if matches!(self.current_token(), Token::LeftParen) {
            self.advance();
            let columns = self.comma_separated(Self::consume_ident)?;
            self.consume(Token::RightParen)?;
            Some(columns)
        } else {
            None
        };

        self.consume(Token::Values)?;
        let values_offset = self.current_offset();
        self.consume(Token::LeftParen)?;
        let values = self.comma_separated(Self::parse_literal)?;
        self.consume(Token::RightParen)?;

        if let Some(columns) = &columns {
            if columns.len() != values.len() {
                return Err(Error::Parse {
                    expected: format!("{} values", columns.len()),
                    found: format!("{} values", values.len()),
                    offset: values_offset,
                });
            }
        }

        Ok(Statement::InsertInto(InsertInto {
            table,
            columns,
            values,
        }))
    }

    fn parse_assignment(&mut self) -> Result<(String, Value)> {
        let column = self.consume_ident()?;
        self.consume(Token::Equal)?;
        let value = self.parse_literal()?;
        Ok((column, value))
    }

    fn parse_update(&mut self) -> Result<Statement> {
        self.consume(Token::Update)?;
        let table = self.consume_ident()?;
        self.consume(Token::Set)?;
        let assignments = self.comma_separated(Self::parse_assignment)?;
        let where_clause = self.parse_where()?;
        Ok(Statement::Update(Update {
            table,
            assignments,
            where_clause,
        }))
    }

    fn parse_delete(&mut self) -> Result<Statement> {
        self.consume(Token::Delete)?;
        self.consume(Token::From)?;
        let table = self.consume_ident()?;
        let where_clause = self.parse_where()?;
        Ok(Statement::Delete(Delete {
            table,
            where_clause,
        }))
    }
}

/// Tokenizes and parses a single statement.
pub fn parse_statement(sql: &str) -> Result<Statement> {
    let tokens = crate::tokenizer::Tokenizer::new(sql).tokenize()?;
    Parser::new(tokens).parse()
}
