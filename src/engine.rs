use std::io;

use tracing::info;

use crate::config::Config;
use crate::database::Database;
use crate::error::{PersistenceError, Result};
use crate::executor::ExecResult;
use crate::storage;

/// A [Database] bound to its durable document.
///
/// Nothing is written until [Engine::save] is called; callers decide when
/// to persist.
#[derive(Debug)]
pub struct Engine {
    config: Config,
    database: Database,
}

impl Engine {
    /// Loads the document at `config.path`, or starts an empty database when
    /// it does not exist and `create_if_missing` is set.
    pub fn open(config: Config) -> Result<Self> {
        let database = if config.path.exists() {
            storage::load(&config.path)?
        } else if config.create_if_missing {
            info!(path = %config.path.display(), name = %config.name, "starting empty database");
            Database::new(config.name.clone())
        } else {
            return Err(PersistenceError::Read {
                path: config.path.clone(),
                source: io::Error::new(io::ErrorKind::NotFound, "no such database file"),
            }
            .into());
        };

        Ok(Self { config, database })
    }

    pub fn execute(&mut self, sql: &str) -> Result<ExecResult> {
        self.database.execute(sql)
    }

    pub fn save(&self) -> Result<()> {
        storage::save(&self.database, &self.config.path)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn database_mut(&mut self) -> &mut Database {
        &mut self.database
    }
}
