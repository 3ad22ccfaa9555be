use mysql::prelude::*;
use mysql::{Conn, OptsBuilder, SslOpts};
use tracing::{debug, info};

use super::sanitize::{category_of, table_name};
use super::RankBackend;
use crate::config::MySqlConfig;
use crate::error::{Result, StoreError};

const NAME: &str = "mysql";

/// Network backend over a single MySQL connection. `rank` is a reserved word
/// since MySQL 8, so the column is always backquoted.
pub struct MySqlBackend {
    conn: Option<Conn>,
    server_version: String,
}

impl MySqlBackend {
    pub fn connect(config: &MySqlConfig) -> Result<Self> {
        let mut opts_builder = OptsBuilder::new()
            .ip_or_hostname(Some(config.host.as_str()))
            .tcp_port(config.port)
            .user(Some(config.user.as_str()))
            .pass(Some(config.password.as_str()))
            .db_name(Some(config.database.as_str()));

        if let Some(ssl_opts) = ssl_opts(config) {
            opts_builder = opts_builder.ssl_opts(ssl_opts);
        }

        let mut conn = Conn::new(opts_builder)?;
        let server_version: String = conn.query_first("SELECT VERSION()")?.unwrap_or_default();
        info!(
            host = %config.host,
            port = config.port,
            database = %config.database,
            version = %server_version,
            "connected to mysql"
        );

        Ok(Self {
            conn: Some(conn),
            server_version,
        })
    }

    pub fn disconnected() -> Self {
        Self {
            conn: None,
            server_version: String::new(),
        }
    }

    fn conn(&mut self) -> Result<&mut Conn> {
        self.conn.as_mut().ok_or(StoreError::NotConnected(NAME))
    }
}

/// TLS settings for the connection. Certificates are only checked when
/// `ssl_verify` is set, so self-signed servers keep working by default.
fn ssl_opts(config: &MySqlConfig) -> Option<SslOpts> {
    if !config.ssl {
        return None;
    }
    let lenient = !config.ssl_verify;
    Some(
        SslOpts::default()
            .with_danger_accept_invalid_certs(lenient)
            .with_danger_skip_domain_validation(lenient),
    )
}

fn table_exists_sql() -> &'static str {
    "SELECT 1 FROM information_schema.tables \
     WHERE table_schema = DATABASE() AND LOWER(table_name) = ?"
}

fn list_tables_sql() -> &'static str {
    "SELECT table_name FROM information_schema.tables \
     WHERE table_schema = DATABASE() AND table_name LIKE 'premium\\_rank\\_%'"
}

fn create_table_sql(table: &str) -> String {
    format!(
        "CREATE TABLE IF NOT EXISTS {table} (
            uuid VARCHAR(36) NOT NULL PRIMARY KEY,
            `rank` INT NOT NULL
        )"
    )
}

fn select_rank_sql(table: &str) -> String {
    format!("SELECT `rank` FROM {table} WHERE uuid = ?")
}

fn insert_rank_sql(table: &str) -> String {
    format!("INSERT INTO {table} (uuid, `rank`) VALUES (?, ?)")
}

fn increment_rank_sql(table: &str) -> String {
    format!("UPDATE {table} SET `rank` = `rank` + 1 WHERE uuid = ?")
}

impl RankBackend for MySqlBackend {
    fn name(&self) -> &'static str {
        NAME
    }

    fn is_connected(&self) -> bool {
        self.conn.is_some()
    }

    fn server_version(&self) -> Option<&str> {
        self.conn.as_ref().map(|_| self.server_version.as_str())
    }

    fn table_exists(&mut self, category: &str) -> Result<bool> {
        let table = table_name(category);
        let found: Option<i64> = self.conn()?.exec_first(table_exists_sql(), (table,))?;
        Ok(found.is_some())
    }

    fn list_categories(&mut self) -> Result<Vec<String>> {
        let names: Vec<String> = self.conn()?.query(list_tables_sql())?;
        Ok(names.iter().filter_map(|name| category_of(name)).collect())
    }

    fn create_table(&mut self, category: &str) -> Result<()> {
        let table = table_name(category);
        self.conn()?.query_drop(create_table_sql(&table))?;
        debug!(%table, "ensured mysql rank table");
        Ok(())
    }

    fn get_rank(&mut self, player_id: &str, category: &str) -> Result<Option<i64>> {
        let sql = select_rank_sql(&table_name(category));
        Ok(self.conn()?.exec_first(sql, (player_id,))?)
    }

    fn upgrade_rank(&mut self, player_id: &str, category: &str) -> Result<()> {
        let table = table_name(category);
        let conn = self.conn()?;

        let current: Option<i64> = conn.exec_first(select_rank_sql(&table), (player_id,))?;
        match current {
            Some(_) => conn.exec_drop(increment_rank_sql(&table), (player_id,))?,
            None => conn.exec_drop(insert_rank_sql(&table), (player_id, 1))?,
        }
        Ok(())
    }

    fn disconnect(&mut self) {
        if self.conn.take().is_some() {
            debug!("closed mysql connection");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ssl_accepts_self_signed_unless_verification_is_requested() {
        let mut config = MySqlConfig::default();
        assert!(ssl_opts(&config).is_none());

        config.ssl = true;
        let opts = ssl_opts(&config).unwrap();
        assert!(opts.accept_invalid_certs());
        assert!(opts.skip_domain_validation());

        config.ssl_verify = true;
        let opts = ssl_opts(&config).unwrap();
        assert!(!opts.accept_invalid_certs());
        assert!(!opts.skip_domain_validation());
    }

    #[test]
    fn statements_quote_reserved_rank_column() {
        let table = table_name("vip");
        assert!(create_table_sql(&table).contains("`rank` INT NOT NULL"));
        assert!(create_table_sql(&table).contains("uuid VARCHAR(36) NOT NULL PRIMARY KEY"));
        assert_eq!(
            select_rank_sql(&table),
            "SELECT `rank` FROM premium_rank_vip WHERE uuid = ?"
        );
        assert_eq!(
            increment_rank_sql(&table),
            "UPDATE premium_rank_vip SET `rank` = `rank` + 1 WHERE uuid = ?"
        );
    }

    #[test]
    fn catalog_queries_are_scoped_to_current_database() {
        assert!(table_exists_sql().contains("table_schema = DATABASE()"));
        assert!(list_tables_sql().contains("table_schema = DATABASE()"));
        assert!(list_tables_sql().ends_with(r"LIKE 'premium\_rank\_%'"));
    }

    #[test]
    fn injected_category_cannot_escape_identifier() {
        let sql = create_table_sql(&table_name("vip; DROP TABLE users"));
        assert!(sql.starts_with("CREATE TABLE IF NOT EXISTS premium_rank_vip__drop_table_users ("));
    }

    #[test]
    fn disconnected_operations_fail_without_io() {
        let mut db = MySqlBackend::disconnected();
        assert!(!db.is_connected());
        assert!(matches!(
            db.list_categories(),
            Err(StoreError::NotConnected("mysql"))
        ));
        assert!(db.upgrade_rank("id", "vip").is_err());
        db.disconnect();
        db.disconnect();
    }
}
