use std::sync::Arc;

use bitvec::prelude::*;
use serde::{Deserialize, Serialize};

use crate::ast::ColumnSpec;
use crate::data_type::DataType;
use crate::error::{Error, Result, internal};
use crate::value::Value;

/// Column metadata in a table schema. Immutable once the table exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDef {
    pub name: String,
    #[serde(rename = "type")]
    pub data_type: DataType,
    pub primary_key: bool,
    /// Always true when `primary_key` is.
    pub unique: bool,
}

impl ColumnDef {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            primary_key: false,
            unique: false,
        }
    }

    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self.unique = true;
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Builds a definition from a parsed column, turning constraint keywords
    /// (`PRIMARY KEY`, `UNIQUE`) into flags.
    pub fn from_spec(spec: &ColumnSpec) -> Result<Self> {
        let mut def = Self::new(spec.name.clone(), spec.data_type);
        let mut keywords = spec.constraints.iter().map(|c| c.to_ascii_uppercase());

        while let Some(keyword) = keywords.next() {
            match keyword.as_str() {
                "PRIMARY" => match keywords.next().as_deref() {
                    Some("KEY") => def = def.primary_key(),
                    _ => {
                        return Err(Error::Schema(format!(
                            "PRIMARY must be followed by KEY on column {:?}",
                            spec.name
                        )));
                    }
                },
                "UNIQUE" => def = def.unique(),
                other => {
                    return Err(Error::Schema(format!(
                        "unexpected constraint {other} on column {:?}",
                        spec.name
                    )));
                }
            }
        }

        Ok(def)
    }

    /// True if the column is enforced through an index.
    pub fn is_constrained(&self) -> bool {
        self.primary_key || self.unique
    }

    /// Coerces then validates `value` for this column.
    pub fn prepare(&self, value: Value) -> Result<Value> {
        let value = self.data_type.coerce(value).map_err(|reason| Error::Type {
            column: self.name.clone(),
            reason,
        })?;

        if !self.data_type.validate(&value) {
            return Err(Error::Type {
                column: self.name.clone(),
                reason: format!("value {value} is not a valid {}", self.data_type),
            });
        }
        Ok(value)
    }
}

/// Typed backing vector of a [Column]. `NULL` slots hold a placeholder.
#[derive(Debug, Clone)]
pub enum ColumnData {
    Int(Vec<i64>),
    Text(Vec<Arc<str>>),
    Bool(BitVec),
}

impl ColumnData {
    fn new(data_type: DataType) -> Self {
        match data_type {
            DataType::Int => Self::Int(Vec::new()),
            DataType::Text => Self::Text(Vec::new()),
            DataType::Boolean => Self::Bool(BitVec::new()),
        }
    }

    fn push_placeholder(&mut self) {
        match self {
            Self::Int(values) => values.push(0),
            Self::Text(values) => values.push(Arc::from("")),
            Self::Bool(values) => values.push(false),
        }
    }

    fn remove(&mut self, row_idx: usize) {
        match self {
            Self::Int(values) => {
                values.remove(row_idx);
            }
            Self::Text(values) => {
                values.remove(row_idx);
            }
            Self::Bool(values) => {
                values.remove(row_idx);
            }
        }
    }

    fn clear(&mut self) {
        match self {
            Self::Int(values) => values.clear(),
            Self::Text(values) => values.clear(),
            Self::Bool(values) => values.clear(),
        }
    }
}

/// One column of a table, stored contiguously.
///
/// `nulls` has one bit per row and is the source of truth for `NULL`; the
/// data vector always has the same length.
#[derive(Debug, Clone)]
pub struct Column {
    pub data_type: DataType,
    pub data: ColumnData,
    pub nulls: BitVec,
}

impl Column {
    pub fn new(data_type: DataType) -> Self {
        Self {
            data_type,
            data: ColumnData::new(data_type),
            nulls: BitVec::new(),
        }
    }

    /// Appends `value`, which must already have the column's type.
    pub fn push(&mut self, value: Value) -> Result<()> {
        let is_null = value.is_null();
        match (&mut self.data, value) {
            (data, Value::Null) => data.push_placeholder(),
            (ColumnData::Int(values), Value::Int(v)) => values.push(v),
            (ColumnData::Text(values), Value::Text(v)) => values.push(v),
            (ColumnData::Bool(values), Value::Bool(v)) => values.push(v),
            (_, other) => {
                return Err(internal!(
                    "value {other:?} pushed into a {} column",
                    self.data_type
                ));
            }
        }
        self.nulls.push(is_null);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.nulls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nulls.is_empty()
    }

    /// The value at `row_idx`, or `None` past the end.
    pub fn get(&self, row_idx: usize) -> Option<Value> {
        if *self.nulls.get(row_idx)? {
            return Some(Value::Null);
        }
        let value = match &self.data {
            ColumnData::Int(values) => Value::Int(values[row_idx]),
            ColumnData::Text(values) => Value::Text(Arc::clone(&values[row_idx])),
            ColumnData::Bool(values) => Value::Bool(values[row_idx]),
        };
        Some(value)
    }

    /// Removes the value at `row_idx`; later rows move down by one.
    pub fn remove(&mut self, row_idx: usize) -> Result<()> {
        if row_idx >= self.len() {
            return Err(internal!("row index {row_idx} out of bounds"));
        }
        self.data.remove(row_idx);
        self.nulls.remove(row_idx);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.data.clear();
        self.nulls.clear();
    }

    /// Overwrites the value at `row_idx`. Setting `NULL` only flips the bit.
    pub fn set(&mut self, row_idx: usize, value: &Value) -> Result<()> {
        if row_idx >= self.len() {
            return Err(internal!("row index {row_idx} out of bounds"));
        }

        match (&mut self.data, value) {
            (_, Value::Null) => {
                self.nulls.set(row_idx, true);
                return Ok(());
            }
            (ColumnData::Int(values), Value::Int(v)) => values[row_idx] = *v,
            (ColumnData::Text(values), Value::Text(v)) => values[row_idx] = Arc::clone(v),
            (ColumnData::Bool(values), Value::Bool(v)) => values.set(row_idx, *v),
            (_, other) => {
                return Err(internal!(
                    "value {other:?} stored into a {} column",
                    self.data_type
                ));
            }
        }
        self.nulls.set(row_idx, false);
        Ok(())
    }
}
