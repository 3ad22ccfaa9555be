use native_tls::TlsConnector;
use postgres::config::SslMode;
use postgres::{Client, Config};
use postgres_native_tls::MakeTlsConnector;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::sanitize::{category_of, table_name};
use super::RankBackend;
use crate::config::PostgresConfig;
use crate::error::{Result, StoreError};

const NAME: &str = "postgresql";

/// Network backend over a single PostgreSQL client.
///
/// Player ids are bound as native `UUID` values, so a malformed id fails
/// before any statement is sent. Upgrades are a single upsert statement and
/// do not race with concurrent writers.
pub struct PostgresBackend {
    client: Option<Client>,
    server_version: String,
}

impl PostgresBackend {
    pub fn connect(config: &PostgresConfig) -> Result<Self> {
        let tls = TlsSettings::parse(&config.sslmode)?;
        let mut client = Config::new()
            .host(&config.host)
            .port(config.port)
            .dbname(&config.database)
            .user(&config.user)
            .password(&config.password)
            .ssl_mode(tls.mode)
            .connect(tls.connector()?)?;

        let server_version: String = client.query_one("SHOW server_version", &[])?.get(0);
        info!(
            host = %config.host,
            port = config.port,
            database = %config.database,
            version = %server_version,
            "connected to postgresql"
        );

        Ok(Self {
            client: Some(client),
            server_version,
        })
    }

    pub fn disconnected() -> Self {
        Self {
            client: None,
            server_version: String::new(),
        }
    }

    fn client(&mut self) -> Result<&mut Client> {
        self.client.as_mut().ok_or(StoreError::NotConnected(NAME))
    }
}

/// Negotiation mode and certificate checks for one `sslmode` value.
///
/// `allow`, `prefer` and `require` encrypt without checking the server
/// certificate, the same as libpq. `verify-ca` checks the chain and
/// `verify-full` also checks the hostname.
#[derive(Debug)]
struct TlsSettings {
    mode: SslMode,
    verify_chain: bool,
    verify_hostname: bool,
}

impl TlsSettings {
    fn parse(raw: &str) -> Result<Self> {
        let (mode, verify_chain, verify_hostname) = match raw.to_ascii_lowercase().as_str() {
            "disable" => (SslMode::Disable, false, false),
            "allow" | "prefer" => (SslMode::Prefer, false, false),
            "require" => (SslMode::Require, false, false),
            "verify-ca" => (SslMode::Require, true, false),
            "verify-full" => (SslMode::Require, true, true),
            _ => return Err(StoreError::UnsupportedSslMode(raw.to_string())),
        };
        Ok(Self {
            mode,
            verify_chain,
            verify_hostname,
        })
    }

    fn connector(&self) -> Result<MakeTlsConnector> {
        let connector = TlsConnector::builder()
            .danger_accept_invalid_certs(!self.verify_chain)
            .danger_accept_invalid_hostnames(!self.verify_hostname)
            .build()?;
        Ok(MakeTlsConnector::new(connector))
    }
}

fn parse_player_id(player_id: &str) -> Result<Uuid> {
    Uuid::parse_str(player_id).map_err(|_| StoreError::InvalidPlayerId(player_id.to_string()))
}

fn table_exists_sql() -> &'static str {
    "SELECT 1 FROM information_schema.tables \
     WHERE table_schema = current_schema() AND lower(table_name) = $1"
}

fn list_tables_sql() -> &'static str {
    "SELECT table_name::text FROM information_schema.tables \
     WHERE table_schema = current_schema() AND table_name LIKE 'premium\\_rank\\_%'"
}

fn create_table_sql(table: &str) -> String {
    format!(
        "CREATE TABLE IF NOT EXISTS {table} (
            uuid UUID PRIMARY KEY,
            rank INTEGER NOT NULL
        )"
    )
}

fn select_rank_sql(table: &str) -> String {
    format!("SELECT rank FROM {table} WHERE uuid = $1")
}

fn upsert_rank_sql(table: &str) -> String {
    format!(
        "INSERT INTO {table} (uuid, rank) VALUES ($1, 1) \
         ON CONFLICT (uuid) DO UPDATE SET rank = {table}.rank + 1"
    )
}

impl RankBackend for PostgresBackend {
    fn name(&self) -> &'static str {
        NAME
    }

    fn is_connected(&self) -> bool {
        self.client.is_some()
    }

    fn server_version(&self) -> Option<&str> {
        self.client.as_ref().map(|_| self.server_version.as_str())
    }

    fn table_exists(&mut self, category: &str) -> Result<bool> {
        let table = table_name(category);
        let row = self.client()?.query_opt(table_exists_sql(), &[&table])?;
        Ok(row.is_some())
    }

    fn list_categories(&mut self) -> Result<Vec<String>> {
        let rows = self.client()?.query(list_tables_sql(), &[])?;
        Ok(rows
            .iter()
            .filter_map(|row| category_of(row.get::<_, &str>(0)))
            .collect())
    }

    fn create_table(&mut self, category: &str) -> Result<()> {
        let table = table_name(category);
        self.client()?.batch_execute(&create_table_sql(&table))?;
        debug!(%table, "ensured postgresql rank table");
        Ok(())
    }

    fn get_rank(&mut self, player_id: &str, category: &str) -> Result<Option<i64>> {
        let id = parse_player_id(player_id)?;
        let sql = select_rank_sql(&table_name(category));
        let row = self.client()?.query_opt(sql.as_str(), &[&id])?;
        Ok(row.map(|row| i64::from(row.get::<_, i32>(0))))
    }

    fn upgrade_rank(&mut self, player_id: &str, category: &str) -> Result<()> {
        let id = parse_player_id(player_id)?;
        let sql = upsert_rank_sql(&table_name(category));
        self.client()?.execute(sql.as_str(), &[&id])?;
        Ok(())
    }

    fn disconnect(&mut self) {
        if let Some(client) = self.client.take() {
            if let Err(err) = client.close() {
                warn!(error = %err, "error while closing postgresql connection");
            }
        }
    }
}
