//! QuillDB: a small embedded relational engine.
//!
//! Statements go through [tokenizer] and [parser] into an [ast], and are
//! run by [Database::execute] against typed, column-oriented [Table]s whose
//! primary key and unique columns are enforced by an [Index]. The whole
//! database round-trips through a JSON document ([storage]).
//!
//! ```
//! use quilldb::{Database, Value};
//!
//! let mut db = Database::new("main");
//! db.execute("CREATE TABLE users (id INT PRIMARY KEY, name TEXT)").unwrap();
//! db.execute("INSERT INTO users VALUES (1, 'Alice')").unwrap();
//!
//! let result = db.query("SELECT name FROM users WHERE id = 1").unwrap();
//! assert_eq!(result.rows[0].get("name"), Some(&Value::from("Alice")));
//! ```

pub mod ast;
pub mod column;
pub mod config;
pub mod data_type;
pub mod database;
pub mod engine;
pub mod error;
pub mod executor;
pub mod index;
mod join;
pub mod parser;
pub mod row;
pub mod storage;
pub mod table;
pub mod tokenizer;
pub mod value;

pub use column::ColumnDef;
pub use config::Config;
pub use data_type::DataType;
pub use database::Database;
pub use engine::Engine;
pub use error::{Error, ErrorKind, PersistenceError, Result};
pub use executor::{ExecResult, QueryResult};
pub use index::Index;
pub use row::Row;
pub use table::{Schema, Table};
pub use value::Value;
