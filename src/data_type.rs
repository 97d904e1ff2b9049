use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// Column types. Stored in the document as `"INT"`, `"TEXT"` and `"BOOLEAN"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DataType {
    /// A 64-bit signed integer.
    Int,
    /// A variable-length UTF-8 character string.
    Text,
    /// A boolean value (true or false).
    Boolean,
}

impl DataType {
    /// Returns true if `value` may be stored in a column of this type.
    /// `NULL` fits every type.
    pub fn validate(&self, value: &Value) -> bool {
        matches!(
            (self, value),
            (_, Value::Null)
                | (Self::Int, Value::Int(_))
                | (Self::Text, Value::Text(_))
                | (Self::Boolean, Value::Bool(_))
        )
    }

    /// Best-effort conversion of `value` to this type.
    ///
    /// - `Int` parses numeric strings.
    /// - `Text` stringifies anything.
    /// - `Boolean` accepts `"true"`/`1` and `"false"`/`0`.
    ///
    /// `NULL` passes through untouched.
    pub fn coerce(&self, value: Value) -> Result<Value, String> {
        match (self, value) {
            (_, Value::Null) => Ok(Value::Null),

            (Self::Int, Value::Int(i)) => Ok(Value::Int(i)),
            (Self::Int, Value::Text(s)) => s
                .trim()
                .parse::<i64>()
                .map(Value::Int)
                .map_err(|_| format!("cannot coerce {:?} to {self}", &*s)),

            (Self::Text, Value::Text(s)) => Ok(Value::Text(s)),
            (Self::Text, other) => Ok(Value::Text(other.to_string().into())),

            (Self::Boolean, Value::Bool(b)) => Ok(Value::Bool(b)),
            (Self::Boolean, Value::Int(1)) => Ok(Value::Bool(true)),
            (Self::Boolean, Value::Int(0)) => Ok(Value::Bool(false)),
            (Self::Boolean, Value::Text(s)) if s.eq_ignore_ascii_case("true") => {
                Ok(Value::Bool(true))
            }
            (Self::Boolean, Value::Text(s)) if s.eq_ignore_ascii_case("false") => {
                Ok(Value::Bool(false))
            }

            (_, other) => Err(format!("cannot coerce {other} to {self}")),
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int => write!(f, "INT"),
            Self::Text => write!(f, "TEXT"),
            Self::Boolean => write!(f, "BOOLEAN"),
        }
    }
}
