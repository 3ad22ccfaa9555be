//! Rank persistence: one contract, three SQL dialects.
//!
//! Each rank category lives in its own table, `premium_rank_<category>`, with
//! a `uuid` primary key and a `rank` counter. Tables are created on demand and
//! discovered through the engine's catalog, so nothing about which categories
//! exist is held in memory.

mod mysql;
mod postgresql;
mod sanitize;
mod sqlite;
mod store;

pub use self::mysql::MySqlBackend;
pub use self::postgresql::PostgresBackend;
pub use self::sqlite::SqliteBackend;
pub use sanitize::{sanitize, table_name, TABLE_PREFIX};
pub use store::{BackendKind, RankStore};

use crate::error::Result;

/// Rank reported for a player with no row in a category.
pub const NO_RANK: i64 = -1;

/// Dialect-specific implementation of the rank persistence contract.
///
/// Implementations own their connection and report failures through
/// [`Result`]; [`RankStore`] decides how those failures surface.
pub trait RankBackend: Send {
    /// Short engine name used in logs.
    fn name(&self) -> &'static str;

    fn is_connected(&self) -> bool;

    /// Engine version reported at connect time; `None` while disconnected.
    fn server_version(&self) -> Option<&str>;

    /// Looks up `premium_rank_<category>` in the catalog, ignoring case.
    fn table_exists(&mut self, category: &str) -> Result<bool>;

    /// Suffixes of every `premium_rank_` table, in catalog order.
    fn list_categories(&mut self) -> Result<Vec<String>>;

    /// Creates the category table if it does not exist yet.
    fn create_table(&mut self, category: &str) -> Result<()>;

    /// The player's rank, or `None` when the table has no row for them.
    fn get_rank(&mut self, player_id: &str, category: &str) -> Result<Option<i64>>;

    /// Inserts the player at rank 1, or adds 1 to an existing row.
    fn upgrade_rank(&mut self, player_id: &str, category: &str) -> Result<()>;

    /// Closes the connection. Calling it again is a no-op.
    fn disconnect(&mut self);
}
