use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info};

use super::sanitize::{category_of, table_name};
use super::RankBackend;
use crate::config::SqliteConfig;
use crate::error::{Result, StoreError};

const NAME: &str = "sqlite";

/// Embedded single-file backend. Upgrades use select-then-write.
pub struct SqliteBackend {
    conn: Option<Connection>,
}

impl SqliteBackend {
    /// Opens (creating if needed) the database file under `data_dir`.
    pub fn connect(config: &SqliteConfig, data_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(data_dir)?;
        let path = data_dir.join(&config.path);
        let conn = Connection::open(&path)?;
        info!(path = %path.display(), "connected to sqlite");
        Ok(Self { conn: Some(conn) })
    }

    /// Private in-memory database, used by tests and dry runs.
    pub fn in_memory() -> Result<Self> {
        Ok(Self {
            conn: Some(Connection::open_in_memory()?),
        })
    }

    /// An adapter whose connection attempt failed.
    pub fn disconnected() -> Self {
        Self { conn: None }
    }

    fn conn(&self) -> Result<&Connection> {
        self.conn.as_ref().ok_or(StoreError::NotConnected(NAME))
    }
}

impl RankBackend for SqliteBackend {
    fn name(&self) -> &'static str {
        NAME
    }

    fn is_connected(&self) -> bool {
        self.conn.is_some()
    }

    fn server_version(&self) -> Option<&str> {
        self.conn.as_ref().map(|_| rusqlite::version())
    }

    fn table_exists(&mut self, category: &str) -> Result<bool> {
        let found = self
            .conn()?
            .query_row(
                "SELECT 1 FROM sqlite_master WHERE type = 'table' AND lower(name) = ?1",
                params![table_name(category)],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }

    fn list_categories(&mut self) -> Result<Vec<String>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT name FROM sqlite_master \
             WHERE type = 'table' AND name LIKE 'premium\\_rank\\_%' ESCAPE '\\'",
        )?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(names.iter().filter_map(|name| category_of(name)).collect())
    }

    fn create_table(&mut self, category: &str) -> Result<()> {
        let table = table_name(category);
        self.conn()?.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS {table} (
                uuid TEXT NOT NULL PRIMARY KEY,
                rank INTEGER NOT NULL
            );"
        ))?;
        debug!(%table, "ensured sqlite rank table");
        Ok(())
    }

    fn get_rank(&mut self, player_id: &str, category: &str) -> Result<Option<i64>> {
        let sql = format!("SELECT rank FROM {} WHERE uuid = ?1", table_name(category));
        let rank = self
            .conn()?
            .query_row(&sql, params![player_id], |row| row.get(0))
            .optional()?;
        Ok(rank)
    }

    fn upgrade_rank(&mut self, player_id: &str, category: &str) -> Result<()> {
        let table = table_name(category);
        let conn = self.conn()?;

        let current: Option<i64> = conn
            .query_row(
                &format!("SELECT rank FROM {table} WHERE uuid = ?1"),
                params![player_id],
                |row| row.get(0),
            )
            .optional()?;

        match current {
            Some(_) => conn.execute(
                &format!("UPDATE {table} SET rank = rank + 1 WHERE uuid = ?1"),
                params![player_id],
            )?,
            None => conn.execute(
                &format!("INSERT INTO {table} (uuid, rank) VALUES (?1, ?2)"),
                params![player_id, 1],
            )?,
        };
        Ok(())
    }

    fn disconnect(&mut self) {
        if let Some(conn) = self.conn.take() {
            if let Err((_, err)) = conn.close() {
                tracing::warn!(error = %err, "error while closing sqlite connection");
            }
        }
    }
}
