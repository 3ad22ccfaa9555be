//! Per-player rank levels for named rank categories ("vip", "vvip", ...),
//! persisted in SQLite, MySQL or PostgreSQL, behind a permission-gated
//! `create` / `upgrade` / `get` command.

pub mod commands;
pub mod completion;
pub mod config;
pub mod database;
pub mod error;
pub mod session;

pub use commands::{Actor, Dispatcher, Outcome, Permission, Player, PlayerDirectory};
pub use config::Config;
pub use database::{BackendKind, RankStore, NO_RANK};
pub use error::{ConfigError, StoreError};
