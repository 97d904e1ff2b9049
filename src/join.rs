//! Two-table inner equi-join.
//!
//! Every field of a joined row is labelled `table.column`. When the right
//! table has an index on its join column the index is probed once per left
//! row; otherwise both sides are compared in a nested loop. `NULL` join keys
//! never match.

use std::sync::Arc;

use tracing::debug;

use crate::ast::{ColumnRef, ColumnsSelect, JoinClause, Select};
use crate::data_type::DataType;
use crate::database::Database;
use crate::error::{Error, Result};
use crate::executor::QueryResult;
use crate::row::Row;
use crate::table::Table;
use crate::value::Value;

/// Labels and types of the merged row layout: left columns, then right.
struct Layout<'a> {
    left: &'a str,
    right: &'a str,
    labels: Arc<[String]>,
    types: Vec<DataType>,
}

impl<'a> Layout<'a> {
    fn new(left: &'a Table, right: &'a Table) -> Self {
        let mut labels = Vec::with_capacity(left.schema().len() + right.schema().len());
        let mut types = Vec::with_capacity(labels.capacity());
        for table in [left, right] {
            for def in &table.schema().columns {
                labels.push(format!("{}.{}", table.name(), def.name));
                types.push(def.data_type);
            }
        }
        Self {
            left: left.name(),
            right: right.name(),
            labels: labels.into(),
            types,
        }
    }

    /// The exact label first; an unqualified name then tries the left table
    /// and then the right one.
    fn resolve(&self, column: &ColumnRef) -> Result<usize> {
        let find = |label: &str| self.labels.iter().position(|l| l == label);

        let direct = match &column.table {
            Some(_) => find(column.to_string().as_str()),
            None => find(column.column.as_str())
                .or_else(|| find(format!("{}.{}", self.left, column.column).as_str()))
                .or_else(|| find(format!("{}.{}", self.right, column.column).as_str())),
        };
        direct.ok_or_else(|| Error::Column(format!("unknown column {column} in join")))
    }
}

/// Position of `column` in `table`, if it names one of its columns.
fn side(table: &Table, column: &ColumnRef) -> Option<usize> {
    column
        .column_in(table.name())
        .and_then(|name| table.schema().position(name))
}

/// Resolves the `ON` operands to `(left position, right position)`; the two
/// operands may be written in either order.
fn join_columns(left: &Table, right: &Table, join: &JoinClause) -> Result<(usize, usize)> {
    if let (Some(l), Some(r)) = (side(left, &join.left), side(right, &join.right)) {
        return Ok((l, r));
    }
    if let (Some(l), Some(r)) = (side(left, &join.right), side(right, &join.left)) {
        return Ok((l, r));
    }
    Err(Error::Column(format!(
        "join condition {} = {} does not relate {:?} and {:?}",
        join.left,
        join.right,
        left.name(),
        right.name()
    )))
}

pub(crate) fn execute(db: &Database, select: &Select, join: &JoinClause) -> Result<QueryResult> {
    let left = db.get_table(&select.table)?;
    let right = db.get_table(&join.table)?;
    if left.name() == right.name() {
        return Err(Error::Schema(format!(
            "table {:?} cannot be joined with itself",
            left.name()
        )));
    }

    let (left_col, right_col) = join_columns(left, right, join)?;
    let right_def = &right.schema().columns[right_col];
    let layout = Layout::new(left, right);

    let left_rows = left.rows();
    let right_rows = right.rows();
    let mut merged = Vec::new();

    let mut emit = |l: &Row, r: &Row| {
        let values = l.values().iter().chain(r.values()).cloned().collect();
        merged.push(Row::new(layout.labels.clone(), values));
    };

    // The probe key takes the right column's type; a key that does not
    // convert cannot match anything.
    let key_of = |row: &Row| -> Option<Value> {
        let key = &row.values()[left_col];
        if key.is_null() {
            return None;
        }
        right_def.data_type.coerce(key.clone()).ok()
    };

    if let Some(index) = right.index(&right_def.name) {
        debug!(left = left.name(), right = right.name(), strategy = "index", "join");
        for l in &left_rows {
            let Some(key) = key_of(l) else { continue };
            for pos in index.find(&key) {
                if let Some(r) = right_rows.get(pos) {
                    emit(l, r);
                }
            }
        }
    } else {
        debug!(left = left.name(), right = right.name(), strategy = "nested-loop", "join");
        for l in &left_rows {
            let Some(key) = key_of(l) else { continue };
            for r in right_rows.iter().filter(|r| r.values()[right_col] == key) {
                emit(l, r);
            }
        }
    }

    if let Some(condition) = &select.where_clause {
        let column = layout.resolve(&condition.column)?;
        let value = layout.types[column]
            .coerce(condition.value.clone())
            .map_err(|reason| Error::Type {
                column: layout.labels[column].clone(),
                reason,
            })?;
        merged.retain(|row| condition.op.evaluate(&row.values()[column], &value));
    }

    let ColumnsSelect::ColumnsNames(refs) = &select.columns else {
        return Ok(QueryResult {
            columns: layout.labels.to_vec(),
            rows: merged,
        });
    };

    let positions = refs
        .iter()
        .map(|column| layout.resolve(column))
        .collect::<Result<Vec<_>>>()?;
    let labels: Vec<String> = refs.iter().map(ToString::to_string).collect();
    let shared: Arc<[String]> = labels.clone().into();
    let rows = merged
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
