use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use crate::ast::{ColumnsSelect, CreateTable, Delete, InsertInto, Select, Statement, Update};
use crate::database::Database;
use crate::error::{Error, Result};
use crate::join;
use crate::parser::parse_statement;
use crate::row::Row;
use crate::table::Table;
use crate::value::Value;

/// Rows produced by a `SELECT`, labelled by the names the query asked for.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl QueryResult {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Outcome of a single statement.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecResult {
    /// `CREATE TABLE` succeeded.
    TableCreated(String),
    /// The inserted row, after coercion.
    Inserted(Row),
    Rows(QueryResult),
    /// Number of rows changed by `UPDATE` or removed by `DELETE`.
    Affected(usize),
}

impl ExecResult {
    pub fn rows(&self) -> Option<&QueryResult> {
        match self {
            Self::Rows(result) => Some(result),
            _ => None,
        }
    }

    pub fn into_rows(self) -> Option<QueryResult> {
        match self {
            Self::Rows(result) => Some(result),
            _ => None,
        }
    }

    pub fn affected(&self) -> Option<usize> {
        match self {
            Self::Affected(count) => Some(*count),
            _ => None,
        }
    }
}

impl fmt::Display for ExecResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TableCreated(name) => write!(f, "table {name} created"),
            Self::Inserted(_) => write!(f, "1 row inserted"),
            Self::Affected(count) => write!(f, "{count} row(s) affected"),
            Self::Rows(result) => {
                writeln!(f, "{}", result.columns.join(" | "))?;
                for row in &result.rows {
                    let values: Vec<String> = row.values().iter().map(Value::to_string).collect();
                    writeln!(f, "{}", values.join(" | "))?;
                }
                write!(f, "({} row(s))", result.len())
            }
        }
    }
}

impl Database {
    /// Parses and runs one SQL statement.
    ///
    /// # Errors
    /// Lexical and parse errors from the front end, plus whatever the
    /// statement itself raises. `UPDATE` and `DELETE` without a `WHERE`
    /// clause are always refused with [Error::Safety].
    pub fn execute(&mut self, sql: &str) -> Result<ExecResult> {
        let statement = parse_statement(sql)?;
        self.execute_statement(statement)
    }

    pub fn execute_statement(&mut self, statement: Statement) -> Result<ExecResult> {
        debug!(statement = statement.name(), "executing");
        match statement {
            Statement::CreateTable(create) => self.execute_create(create),
            Statement::InsertInto(insert) => self.execute_insert(insert).map(ExecResult::Inserted),
            Statement::Select(select) => self.select(&select).map(ExecResult::Rows),
            Statement::Update(update) => self.execute_update(update).map(ExecResult::Affected),
            Statement::Delete(delete) => self.execute_delete(delete).map(ExecResult::Affected),
        }
    }

    /// Runs a read-only statement. Anything but a `SELECT` is rejected
    /// before it can touch the database.
    pub fn query(&self, sql: &str) -> Result<QueryResult> {
        match parse_statement(sql)? {
            Statement::Select(select) => self.select(&select),
            other => Err(Error::Parse {
                expected: "SELECT".into(),
                found: other.name().into(),
                offset: 0,
            }),
        }
    }

    pub fn select(&self, select: &Select) -> Result<QueryResult> {
        if let Some(join) = &select.join {
            return join::execute(self, select, join);
        }

        let table = self.get_table(&select.table)?;
        let rows = table.find(select.where_clause.as_ref())?;
        project(table, &select.columns, rows)
    }

    fn execute_create(&mut self, create: CreateTable) -> Result<ExecResult> {
        self.create_table(&create.name, &create.columns)?;
        Ok(ExecResult::TableCreated(create.name))
    }

    fn execute_insert(&mut self, insert: InsertInto) -> Result<Row> {
        let table = self.get_table_mut(&insert.table)?;

        let columns = match insert.columns {
            Some(columns) => columns,
            None => table.schema().names(),
        };
        if columns.len() != insert.values.len() {
            return Err(Error::Schema(format!(
                "table {:?} expects {} value(s), got {}",
                insert.table,
                columns.len(),
                insert.values.len()
            )));
        }

        table.insert(columns.into_iter().zip(insert.values).collect())
    }

    fn execute_update(&mut self, update: Update) -> Result<usize> {
        let Some(condition) = update.where_clause else {
            warn!(table = %update.table, "UPDATE without WHERE refused");
            return Err(Error::Safety { statement: "UPDATE" });
        };
        self.get_table_mut(&update.table)?
            .update(update.assignments, Some(&condition))
    }

    fn execute_delete(&mut self, delete: Delete) -> Result<usize> {
        let Some(condition) = delete.where_clause else {
            warn!(table = %delete.table, "DELETE without WHERE refused");
            return Err(Error::Safety { statement: "DELETE" });
        };
        self.get_table_mut(&delete.table)?.delete(Some(&condition))
    }
}

/// Narrows full table rows to the requested columns.
fn project(table: &Table, columns: &ColumnsSelect, rows: Vec<Row>) -> Result<QueryResult> {
    let ColumnsSelect::ColumnsNames(refs) = columns else {
        return Ok(QueryResult {
            columns: table.schema().names(),
            rows,
        });
    };

    let positions = refs
        .iter()
        .map(|column| {
            column
                .column_in(table.name())
                .and_then(|name| table.schema().position(name))
                .ok_or_else(|| {
                    Error::Column(format!(
                        "unknown column {column} in table {:?}",
                        table.name()
                    ))
                })
        })
        .collect::<Result<Vec<_>>>()?;

    let labels: Vec<String> = refs.iter().map(ToString::to_string).collect();
    let shared: Arc<[String]> = labels.clone().into();
    let rows = rows
        .into_iter()
        .map(|row| {
            let values = positions.iter().map(|p| row.values()[*p].clone()).collect();
            Row::new(shared.clone(), values)
        })
        .collect();

    Ok(QueryResult {
        columns: labels,
        rows,
    })
}
