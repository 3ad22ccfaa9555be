//! YAML configuration.
//!
//! Every key carries a default, so an empty file (or no file at all) yields a
//! working SQLite setup.
//!
//! ```yaml
//! database:
//!   type: mysql
//!   mysql:
//!     host: db.internal
//!     port: 3306
//!     database: mcengine
//!     user: premium
//!     password: secret
//!     ssl: true
//! console:
//!   permissions: ["mcengine.premium.rank.create"]
//! players:
//!   - name: Steve
//!     uuid: 069a79f4-44e9-4726-a5be-fca90e38aaf5
//!     permissions: ["*"]
//! ```

use std::path::Path;

use serde::Deserialize;
use uuid::Uuid;

use crate::error::ConfigError;

/// Top-level configuration file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub console: ConsoleConfig,
    /// Players considered online for the lifetime of the console.
    pub players: Vec<PlayerConfig>,
}

impl Config {
    /// Reads and parses a YAML configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml(&text)
    }

    /// Parses configuration from YAML text. Blank text yields the defaults.
    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }
}

/// The `database` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// One of `sqlite`, `mysql`, `postgresql` (case-insensitive). Validated
    /// when the store is opened, not when the file is parsed.
    #[serde(rename = "type")]
    pub kind: String,
    pub sqlite: SqliteConfig,
    pub mysql: MySqlConfig,
    pub postgresql: PostgresConfig,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            kind: "sqlite".to_string(),
            sqlite: SqliteConfig::default(),
            mysql: MySqlConfig::default(),
            postgresql: PostgresConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SqliteConfig {
    /// Database file, resolved against the data directory unless absolute.
    pub path: String,
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self {
            path: "premium.db".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MySqlConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: String,
    pub ssl: bool,
    /// Check the server certificate chain and hostname when `ssl` is on.
    pub ssl_verify: bool,
}

impl Default for MySqlConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 3306,
            database: "mcengine".to_string(),
            user: "root".to_string(),
            password: String::new(),
            ssl: false,
            ssl_verify: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PostgresConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: String,
    /// `disable`, `allow`, `prefer`, `require`, `verify-ca` or `verify-full`.
    pub sslmode: String,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            database: "mcengine".to_string(),
            user: "postgres".to_string(),
            password: String::new(),
            sslmode: "disable".to_string(),
        }
    }
}

/// Permissions held by the console actor (no player selected).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    pub permissions: Vec<String>,
}

/// One entry of the online-player directory.
#[derive(Debug, Clone, Deserialize)]
pub struct PlayerConfig {
    pub name: String,
    pub uuid: Uuid,
    #[serde(default)]
    pub permissions: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config = Config::from_yaml("").unwrap();
        assert_eq!(config.database.kind, "sqlite");
        assert_eq!(config.database.sqlite.path, "premium.db");
        assert_eq!(config.database.mysql.port, 3306);
        assert_eq!(config.database.mysql.user, "root");
        assert!(!config.database.mysql.ssl);
        assert!(!config.database.mysql.ssl_verify);
        assert_eq!(config.database.postgresql.port, 5432);
        assert_eq!(config.database.postgresql.user, "postgres");
        assert_eq!(config.database.postgresql.sslmode, "disable");
        assert!(config.players.is_empty());
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let yaml = r#"
database:
  type: PostgreSQL
  postgresql:
    host: pg.internal
    sslmode: require
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.database.kind, "PostgreSQL");
        assert_eq!(config.database.postgresql.host, "pg.internal");
        assert_eq!(config.database.postgresql.sslmode, "require");
        assert_eq!(config.database.postgresql.database, "mcengine");
        assert_eq!(config.database.mysql.host, "localhost");
    }

    #[test]
    fn mysql_certificate_checks_are_opt_in() {
        let yaml = "database:\n  mysql:\n    ssl: true\n";
        let config = Config::from_yaml(yaml).unwrap();
        assert!(config.database.mysql.ssl);
        assert!(!config.database.mysql.ssl_verify);

        let yaml = "database:\n  mysql:\n    ssl: true\n    ssl_verify: true\n";
        assert!(Config::from_yaml(yaml).unwrap().database.mysql.ssl_verify);
    }

    #[test]
    fn players_and_console_permissions() {
        let yaml = r#"
console:
  permissions: ["mcengine.premium.rank.create"]
players:
  - name: Steve
    uuid: 069a79f4-44e9-4726-a5be-fca90e38aaf5
    permissions: ["*"]
  - name: Alex
    uuid: 853c80ef-3c37-49fd-aa49-938b674adae6
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.console.permissions, vec!["mcengine.premium.rank.create"]);
        assert_eq!(config.players.len(), 2);
        assert_eq!(config.players[0].permissions, vec!["*"]);
        assert!(config.players[1].permissions.is_empty());
    }

    #[test]
    fn malformed_uuid_is_rejected() {
        let yaml = "players:\n  - name: Steve\n    uuid: not-a-uuid\n";
        assert!(matches!(Config::from_yaml(yaml), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = Config::load(Path::new("/nonexistent/premium/config.yml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/premium/config.yml"));
    }
}
