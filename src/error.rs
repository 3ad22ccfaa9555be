//! Error types for the rank store and its configuration.

use thiserror::Error;

/// Errors raised by the rank store and its backend adapters.
///
/// Only [`StoreError::UnsupportedBackend`] ever reaches a caller of
/// [`RankStore`](crate::database::RankStore); every other variant is logged
/// at the adapter boundary and collapsed into the store's sentinel values.
#[derive(Debug, Error)]
pub enum StoreError {
    /// `database.type` names an engine this crate has no adapter for.
    #[error("unsupported database type: {0}")]
    UnsupportedBackend(String),

    /// The adapter never connected or has already been closed.
    #[error("not connected to {0}")]
    NotConnected(&'static str),

    /// A player identity that the backend cannot bind (native UUID columns).
    #[error("invalid player id '{0}'")]
    InvalidPlayerId(String),

    /// A PostgreSQL `sslmode` this crate cannot honor.
    #[error("unsupported postgresql sslmode '{0}'")]
    UnsupportedSslMode(String),

    /// Filesystem failure while preparing the SQLite data directory.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("mysql error: {0}")]
    MySql(#[from] mysql::Error),

    #[error("postgresql error: {0}")]
    Postgres(#[from] postgres::Error),

    #[error("tls error: {0}")]
    Tls(#[from] native_tls::Error),
}

/// Errors raised while loading the YAML configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Convenience alias for results with [`StoreError`].
pub type Result<T> = std::result::Result<T, StoreError>;
