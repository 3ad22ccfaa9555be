use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{error, info};

use super::{MySqlBackend, PostgresBackend, RankBackend, SqliteBackend, NO_RANK};
use crate::config::DatabaseConfig;
use crate::error::{Result, StoreError};

/// Engines accepted by `database.type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Sqlite,
    MySql,
    Postgres,
}

impl FromStr for BackendKind {
    type Err = StoreError;

    fn from_str(raw: &str) -> Result<Self> {
        match raw.to_lowercase().as_str() {
            "sqlite" => Ok(Self::Sqlite),
            "mysql" => Ok(Self::MySql),
            "postgresql" => Ok(Self::Postgres),
            _ => Err(StoreError::UnsupportedBackend(raw.to_string())),
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Sqlite => "sqlite",
            Self::MySql => "mysql",
            Self::Postgres => "postgresql",
        })
    }
}

/// Process-wide rank store.
///
/// Wraps the one backend selected at construction and serializes every call
/// through an internal lock, so the select-then-write upgrade used by SQLite
/// and MySQL cannot interleave with another call from this process. Backend
/// failures are logged here and reported to callers as the "not found"
/// values: `false`, [`NO_RANK`], an empty list, or nothing at all.
pub struct RankStore {
    kind: BackendKind,
    backend: Mutex<Box<dyn RankBackend>>,
}

impl RankStore {
    /// Selects and connects the backend named by `config.kind`.
    ///
    /// Only an unrecognized backend name is an error. A failed connection is
    /// logged and leaves the store disconnected.
    pub fn open(config: &DatabaseConfig, data_dir: &Path) -> Result<Self> {
        let kind: BackendKind = config.kind.parse()?;
        let backend: Box<dyn RankBackend> = match kind {
            BackendKind::Sqlite => connected_or_logged(
                kind,
                SqliteBackend::connect(&config.sqlite, data_dir),
                SqliteBackend::disconnected,
            ),
            BackendKind::MySql => connected_or_logged(
                kind,
                MySqlBackend::connect(&config.mysql),
                MySqlBackend::disconnected,
            ),
            BackendKind::Postgres => connected_or_logged(
                kind,
                PostgresBackend::connect(&config.postgresql),
                PostgresBackend::disconnected,
            ),
        };
        info!(backend = %kind, connected = backend.is_connected(), "rank store opened");
        Ok(Self::with_backend(kind, backend))
    }

    /// Wraps an already-built backend.
    pub fn with_backend(kind: BackendKind, backend: Box<dyn RankBackend>) -> Self {
        Self {
            kind,
            backend: Mutex::new(backend),
        }
    }

    pub fn kind(&self) -> BackendKind {
        self.kind
    }

    pub fn is_connected(&self) -> bool {
        self.backend().is_connected()
    }

    pub fn server_version(&self) -> Option<String> {
        self.backend().server_version().map(str::to_string)
    }

    pub fn rank_table_exists(&self, category: &str) -> bool {
        let mut backend = self.backend();
        logged(
            backend.name(),
            "table_exists",
            category,
            backend.table_exists(category),
        )
        .unwrap_or(false)
    }

    /// Categories discovered from existing rank tables. Order is whatever the
    /// engine's catalog returns.
    pub fn list_available_rank_types(&self) -> Vec<String> {
        let mut backend = self.backend();
        logged(backend.name(), "list_categories", "*", backend.list_categories())
            .unwrap_or_default()
    }

    pub fn create_rank_table(&self, category: &str) {
        let mut backend = self.backend();
        let _ = logged(
            backend.name(),
            "create_table",
            category,
            backend.create_table(category),
        );
    }

    /// The player's rank in `category`, or [`NO_RANK`].
    pub fn get_rank(&self, player_id: &str, category: &str) -> i64 {
        let mut backend = self.backend();
        logged(
            backend.name(),
            "get_rank",
            category,
            backend.get_rank(player_id, category),
        )
        .flatten()
        .unwrap_or(NO_RANK)
    }

    /// Inserts the player at rank 1 or increments an existing rank.
    pub fn upgrade_rank(&self, player_id: &str, category: &str) {
        let mut backend = self.backend();
        let _ = logged(
            backend.name(),
            "upgrade_rank",
            category,
            backend.upgrade_rank(player_id, category),
        );
    }

    pub fn disconnect(&self) {
        self.backend().disconnect();
    }

    fn backend(&self) -> MutexGuard<'_, Box<dyn RankBackend>> {
        self.backend.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for RankStore {
    fn drop(&mut self) {
        self.disconnect();
    }
}

impl fmt::Debug for RankStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RankStore")
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

fn connected_or_logged<B: RankBackend + 'static>(
    kind: BackendKind,
    connected: Result<B>,
    disconnected: fn() -> B,
) -> Box<dyn RankBackend> {
    match connected {
        Ok(backend) => Box::new(backend),
        Err(err) => {
            error!(backend = %kind, error = %err, "failed to connect, store is disconnected");
            Box::new(disconnected())
        }
    }
}

fn logged<T>(backend: &str, op: &str, category: &str, result: Result<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            error!(backend, op, category, error = %err, "rank store operation failed");
            None
        }
    }
}
