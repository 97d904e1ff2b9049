//! Durable JSON document holding a whole [Database].
//!
//! ```json
//! {"name": "main", "tables": {"users": {
//!     "name": "users",
//!     "columns": [{"name": "id", "type": "INT", "primaryKey": true, "unique": true}],
//!     "rows": [{"id": 1}],
//!     "indexes": {"id": {"columnName": "id", "isPrimaryKey": true, "isUnique": true,
//!                        "indexMap": {"1": [0]}}}}}}
//! ```
//!
//! The index payload is written for readers of the file only. Loading
//! re-inserts every row, which rebuilds the indexes and re-checks every
//! constraint.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::column::ColumnDef;
use crate::database::Database;
use crate::error::{PersistenceError, Result};
use crate::index::Index;
use crate::row::Row;
use crate::table::Table;
use crate::value::Value;

#[derive(Serialize, Deserialize)]
struct DatabaseDocument<R> {
    name: String,
    tables: BTreeMap<String, TableDocument<R>>,
}

#[derive(Serialize, Deserialize)]
struct TableDocument<R> {
    name: String,
    columns: Vec<ColumnDef>,
    rows: Vec<R>,
    #[serde(default)]
    indexes: BTreeMap<String, IndexDocument>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IndexDocument {
    column_name: String,
    is_primary_key: bool,
    is_unique: bool,
    /// JSON encoding of the value (`null` for the null bucket) to positions.
    index_map: BTreeMap<String, Vec<usize>>,
}

impl IndexDocument {
    fn from_index(index: &Index) -> Result<Self, serde_json::Error> {
        let index_map = index
            .entries()
            .map(|(value, positions)| {
                let key = serde_json::to_string(&value)?;
                Ok((key, positions.iter().copied().collect::<Vec<_>>()))
            })
            .collect::<Result<BTreeMap<_, _>, serde_json::Error>>()?;

        Ok(Self {
            column_name: index.column().to_string(),
            is_primary_key: index.is_primary_key(),
            is_unique: index.is_unique(),
            index_map,
        })
    }
}

fn table_document(table: &Table) -> Result<TableDocument<Row>, serde_json::Error> {
    let indexes = table
        .indexes()
        .map(|index| Ok((index.column().to_string(), IndexDocument::from_index(index)?)))
        .collect::<Result<BTreeMap<_, _>, serde_json::Error>>()?;

    Ok(TableDocument {
        name: table.name().to_string(),
        columns: table.schema().columns.clone(),
        rows: table.rows(),
        indexes,
    })
}

/// Encodes `db` as a pretty-printed JSON document.
pub fn to_json(db: &Database) -> Result<String> {
    let tables = db
        .tables()
        .map(|table| Ok((table.name().to_string(), table_document(table)?)))
        .collect::<Result<BTreeMap<_, _>, serde_json::Error>>()
        .map_err(PersistenceError::from)?;
    let document = DatabaseDocument {
        name: db.name().to_string(),
        tables,
    };
    Ok(serde_json::to_string_pretty(&document).map_err(PersistenceError::from)?)
}

/// Writes `db` to `path`, creating parent directories as needed. The file is
/// overwritten in place.
pub fn save(db: &Database, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let json = to_json(db)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| PersistenceError::Write {
            path: path.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, json).map_err(|source| PersistenceError::Write {
        path: path.to_path_buf(),
        source,
    })?;

    info!(path = %path.display(), tables = db.list_tables().len(), "database saved");
    Ok(())
}

/// Reads the document at `path` back into a [Database].
///
/// # Errors
/// [PersistenceError::Read] if the file cannot be read, and
/// [PersistenceError::Corrupt] if it is not a valid document or its rows
/// break the schema they are stored under.
pub fn load(path: impl AsRef<Path>) -> Result<Database> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| PersistenceError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let db = from_json(&text).map_err(|reason| PersistenceError::Corrupt {
        path: path.to_path_buf(),
        reason,
    })?;

    info!(path = %path.display(), tables = db.list_tables().len(), "database loaded");
    Ok(db)
}

fn from_json(text: &str) -> Result<Database, String> {
    let document: DatabaseDocument<BTreeMap<String, Value>> =
        serde_json::from_str(text).map_err(|err| err.to_string())?;

    let mut db = Database::new(document.name);
    for (key, doc) in document.tables {
        if key != doc.name {
            return Err(format!("table {key:?} is stored under the name {:?}", doc.name));
        }
        let mut table = Table::new(doc.name, doc.columns).map_err(|err| err.to_string())?;
        for (pos, row) in doc.rows.into_iter().enumerate() {
            table
                .insert(row.into_iter().collect())
                .map_err(|err| format!("row {pos} of table {key:?}: {err}"))?;
        }
        db.add_table(table).map_err(|err| err.to_string())?;
    }
    Ok(db)
}
