use std::fmt;

use crate::{DataType, Value};

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    CreateTable(CreateTable),
    InsertInto(InsertInto),
    Select(Select),
    Update(Update),
    Delete(Delete),
}

impl Statement {
    /// Upper-case statement name, used in logs and error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Self::CreateTable(_) => "CREATE TABLE",
            Self::InsertInto(_) => "INSERT",
            Self::Select(_) => "SELECT",
            Self::Update(_) => "UPDATE",
            Self::Delete(_) => "DELETE",
        }
    }
}

/// One column of a `CREATE TABLE`, with its constraint keywords as written
/// (e.g. `["PRIMARY", "KEY"]`).
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSpec {
    pub name: String,
    pub data_type: DataType,
    pub constraints: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateTable {
    pub name: String,
    pub columns: Vec<ColumnSpec>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InsertInto {
    pub table: String,
    pub columns: Option<Vec<String>>,
    pub values: Vec<Value>,
}

/// A column name, optionally qualified by a table name (`users.id`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRef {
    pub table: Option<String>,
    pub column: String,
}

impl ColumnRef {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            table: None,
            column: column.into(),
        }
    }

    pub fn qualified(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            table: Some(table.into()),
            column: column.into(),
        }
    }

    /// Resolves this reference against a single table: unqualified names and
    /// names qualified by `table` yield the bare column name.
    pub fn column_in(&self, table: &str) -> Option<&str> {
        match &self.table {
            Some(qualifier) if qualifier != table => None,
            _ => Some(&self.column),
        }
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.table {
            Some(table) => write!(f, "{table}.{}", self.column),
            None => write!(f, "{}", self.column),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ColumnsSelect {
    Star,
    ColumnsNames(Vec<ColumnRef>),
}

/// `JOIN table ON left = right`
#[derive(Debug, Clone, PartialEq)]
pub struct JoinClause {
    pub table: String,
    pub left: ColumnRef,
    pub right: ColumnRef,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    pub columns: ColumnsSelect,
    pub table: String,
    pub join: Option<JoinClause>,
    pub where_clause: Option<Condition>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Update {
    pub table: String,
    pub assignments: Vec<(String, Value)>,
    pub where_clause: Option<Condition>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Delete {
    pub table: String,
    pub where_clause: Option<Condition>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOp {
    Eq,
    NotEq,
    Gt,
    Lt,
    GtEq,
    LtEq,
}

impl ComparisonOp {
    /// Applies the operator to a stored value (`left`) and a literal (`right`).
    ///
    /// `=` and `!=` compare structurally, so `NULL = NULL` holds. Ordering
    /// operators use the native ordering of the type and are false whenever
    /// a side is `NULL` or the types differ.
    pub fn evaluate(&self, left: &Value, right: &Value) -> bool {
        match self {
            Self::Eq => left == right,
            Self::NotEq => left != right,
            Self::Gt => left.compare(right).is_some_and(|o| o.is_gt()),
            Self::Lt => left.compare(right).is_some_and(|o| o.is_lt()),
            Self::GtEq => left.compare(right).is_some_and(|o| o.is_ge()),
            Self::LtEq => left.compare(right).is_some_and(|o| o.is_le()),
        }
    }
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match self {
            Self::Eq => "=",
            Self::NotEq => "!=",
            Self::Gt => ">",
            Self::Lt => "<",
            Self::GtEq => ">=",
            Self::LtEq => "<=",
        };
        f.write_str(op)
    }
}

/// A single `column op literal` predicate. There is no boolean composition.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub column: ColumnRef,
    pub op: ComparisonOp,
    pub value: Value,
}

impl Condition {
    pub fn new(column: impl Into<String>, op: ComparisonOp, value: impl Into<Value>) -> Self {
        Self {
            column: ColumnRef::new(column),
            op,
            value: value.into(),
        }
    }
}
