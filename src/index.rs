use std::collections::{BTreeSet, HashMap};

use tracing::trace;

use crate::column::ColumnDef;
use crate::error::{Error, Result};
use crate::value::Value;

/// Bucket key of an [Index]. `NULL` has its own sentinel bucket so it can
/// never collide with a stored value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum IndexKey {
    Null,
    Value(Value),
}

impl From<&Value> for IndexKey {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            other => Self::Value(other.clone()),
        }
    }
}

/// Maps the values of one column to the positions of the rows holding them.
///
/// Unique indexes hold at most one position per non-null value. Any number of
/// rows may sit in the `NULL` bucket.
#[derive(Debug, Clone)]
pub struct Index {
    column: String,
    is_primary_key: bool,
    is_unique: bool,
    entries: HashMap<IndexKey, BTreeSet<usize>>,
}

impl Index {
    pub fn new(column: impl Into<String>, is_primary_key: bool, is_unique: bool) -> Self {
        Self {
            column: column.into(),
            is_primary_key,
            is_unique: is_unique || is_primary_key,
            entries: HashMap::new(),
        }
    }

    pub fn for_column(def: &ColumnDef) -> Self {
        Self::new(def.name.clone(), def.primary_key, def.unique)
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn is_primary_key(&self) -> bool {
        self.is_primary_key
    }

    pub fn is_unique(&self) -> bool {
        self.is_unique
    }

    /// Records that the row at `pos` holds `value`.
    ///
    /// # Errors
    /// [Error::ConstraintViolation] if the index is unique and another row
    /// already holds the (non-null) value.
    pub fn add(&mut self, value: &Value, pos: usize) -> Result<()> {
        let key = IndexKey::from(value);

        if self.is_unique && !value.is_null() {
            let taken = self
                .entries
                .get(&key)
                .is_some_and(|bucket| bucket.iter().any(|p| *p != pos));
            if taken {
                return Err(self.duplicate(value));
            }
        }

        trace!(column = %self.column, %value, pos, "index add");
        self.entries.entry(key).or_default().insert(pos);
        Ok(())
    }

    /// Forgets that the row at `pos` holds `value`.
    pub fn remove(&mut self, value: &Value, pos: usize) {
        let key = IndexKey::from(value);
        if let Some(bucket) = self.entries.get_mut(&key) {
            bucket.remove(&pos);
            if bucket.is_empty() {
                self.entries.remove(&key);
            }
        }
        trace!(column = %self.column, %value, pos, "index remove");
    }

    /// Moves the row at `pos` from `old` to `new`.
    ///
    /// When `new` cannot be added the entry for `old` is restored, leaving the
    /// index as it was.
    pub fn update(&mut self, old: &Value, new: &Value, pos: usize) -> Result<()> {
        if old == new {
            return Ok(());
        }
        self.remove(old, pos);
        if let Err(err) = self.add(new, pos) {
            self.entries
                .entry(IndexKey::from(old))
                .or_default()
                .insert(pos);
            return Err(err);
        }
        Ok(())
    }

    /// Positions of the rows holding `value`, in ascending order.
    pub fn find(&self, value: &Value) -> Vec<usize> {
        self.entries
            .get(&IndexKey::from(value))
            .map(|bucket| bucket.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn has(&self, value: &Value) -> bool {
        self.entries.contains_key(&IndexKey::from(value))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Rebuilds the index from scratch, the i-th value belonging to row i.
    pub fn rebuild(&mut self, values: impl IntoIterator<Item = Value>) -> Result<()> {
        self.clear();
        for (pos, value) in values.into_iter().enumerate() {
            self.add(&value, pos)?;
        }
        Ok(())
    }

    /// Number of positions tracked, `NULL` bucket included.
    pub fn len(&self) -> usize {
        self.entries.values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every `(value, positions)` bucket, in no particular order.
    pub fn entries(&self) -> impl Iterator<Item = (Value, &BTreeSet<usize>)> {
        self.entries.iter().map(|(key, bucket)| {
            let value = match key {
                IndexKey::Null => Value::Null,
                IndexKey::Value(value) => value.clone(),
            };
            (value, bucket)
        })
    }

    /// Error raised when `value` is already taken in this index.
    pub(crate) fn duplicate(&self, value: &Value) -> Error {
        duplicate(&self.column, self.is_primary_key, value)
    }
}

fn duplicate(column: &str, is_primary_key: bool, value: &Value) -> Error {
    let kind = if is_primary_key {
        "primary key"
    } else {
        "unique"
    };
    let shown = match value {
        Value::Text(s) => format!("'{s}'"),
        other => other.to_string(),
    };
    Error::ConstraintViolation {
        column: column.to_string(),
        reason: format!("duplicate {kind} value {shown}"),
    }
}
