use std::collections::HashMap;

use tracing::debug;

use crate::ast::ColumnSpec;
use crate::column::ColumnDef;
use crate::error::{Error, Result};
use crate::table::Table;

/// A named collection of tables, owned by the caller.
///
/// Statement execution lives in [crate::executor]; persistence in
/// [crate::storage].
#[derive(Debug, Clone, Default)]
pub struct Database {
    name: String,
    /// A map of table names to their respective [Table] structures.
    tables: HashMap<String, Table>,
}

impl Database {
    /// Creates a new, empty database instance.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tables: HashMap::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Creates a new table from parsed column specs, turning constraint
    /// keywords into flags.
    ///
    /// # Errors
    /// Returns [Error::Schema] if a table with the same name already exists
    /// or the columns do not form a valid schema.
    pub fn create_table(&mut self, name: &str, columns: &[ColumnSpec]) -> Result<&Table> {
        let defs = columns
            .iter()
            .map(ColumnDef::from_spec)
            .collect::<Result<Vec<_>>>()?;
        self.create_table_with_defs(name, defs)
    }

    /// Same as [Database::create_table] for already built definitions.
    pub fn create_table_with_defs(&mut self, name: &str, columns: Vec<ColumnDef>) -> Result<&Table> {
        if self.tables.contains_key(name) {
            return Err(Error::Schema(format!("table {name:?} already exists")));
        }
        let table = Table::new(name, columns)?;
        debug!(table = name, columns = table.schema().len(), "table created");
        Ok(self.tables.entry(name.to_string()).or_insert(table))
    }

    /// Registers an already built table.
    pub fn add_table(&mut self, table: Table) -> Result<()> {
        if self.tables.contains_key(table.name()) {
            return Err(Error::Schema(format!(
                "table {:?} already exists",
                table.name()
            )));
        }
        self.tables.insert(table.name().to_string(), table);
        Ok(())
    }

    /// Removes a table from the database by its name.
    ///
    /// # Errors
    /// Returns an error if the table does not exist.
    pub fn drop_table(&mut self, name: &str) -> Result<Table> {
        self.tables
            .remove(name)
            .ok_or_else(|| Error::Schema(format!("table {name:?} does not exist")))
    }

    /// Retrieves a reference to a table by name.
    pub fn get_table(&self, name: &str) -> Result<&Table> {
        self.tables
            .get(name)
            .ok_or_else(|| Error::Schema(format!("table {name:?} does not exist")))
    }

    /// Retrieves a mutable reference to a table by name.
    pub fn get_table_mut(&mut self, name: &str) -> Result<&mut Table> {
        self.tables
            .get_mut(name)
            .ok_or_else(|| Error::Schema(format!("table {name:?} does not exist")))
    }

    pub fn has_table(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    /// Returns the names of all tables, sorted.
    pub fn list_tables(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tables.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Column metadata of a table.
    pub fn get_table_schema(&self, name: &str) -> Result<&[ColumnDef]> {
        Ok(&self.get_table(name)?.schema().columns)
    }

    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.tables.values()
    }
}
