use std::sync::Arc;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::{Error, Result};
use crate::value::Value;

/// A record keyed by a fixed set of column names.
///
/// Rows returned by the engine are copies: mutating one never touches the
/// table it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    columns: Arc<[String]>,
    values: Vec<Value>,
}

impl Row {
    /// `values` must line up with `columns`.
    pub(crate) fn new(columns: Arc<[String]>, values: Vec<Value>) -> Self {
        debug_assert_eq!(columns.len(), values.len());
        Self { columns, values }
    }

    /// Builds a row over `columns` from `(name, value)` pairs. Columns without
    /// a pair are `NULL`.
    ///
    /// # Errors
    /// [Error::Column] if a name is not one of `columns` or is given twice.
    pub fn from_pairs(
        columns: Arc<[String]>,
        pairs: impl IntoIterator<Item = (String, Value)>,
    ) -> Result<Self> {
        let mut values = vec![Value::Null; columns.len()];
        let mut seen = vec![false; columns.len()];

        for (name, value) in pairs {
            let idx = columns
                .iter()
                .position(|c| *c == name)
                .ok_or_else(|| Error::Column(format!("unknown column {name:?}")))?;
            if seen[idx] {
                return Err(Error::Column(format!("column {name:?} given more than once")));
            }
            seen[idx] = true;
            values[idx] = value;
        }

        Ok(Self { columns, values })
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|idx| &self.values[idx])
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn into_values(self) -> Vec<Value> {
        self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Serialized as a JSON object in column order.
impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (column, value) in self.iter() {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}
