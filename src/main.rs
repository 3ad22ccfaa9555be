use clap::{Arg, ArgAction, Command};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::warn;
use tracing_subscriber::EnvFilter;

mod cli;

use cli::Cli;
use premium_rank::config::Config;
use premium_rank::database::{BackendKind, RankStore};
use premium_rank::session::{Session, StaticDirectory};

fn main() -> anyhow::Result<()> {
    let matches = Command::new("premium")
        .version("0.1.0")
        .about("Per-player premium rank console")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("YAML config file (default: <data-dir>/config.yml)"),
        )
        .arg(
            Arg::new("data-dir")
                .short('d')
                .long("data-dir")
                .value_name("DIR")
                .help("Directory holding the config and the SQLite database")
                .default_value("."),
        )
        .arg(
            Arg::new("db-type")
                .short('t')
                .long("db-type")
                .value_name("TYPE")
                .help("Overrides database.type (sqlite, mysql, postgresql)"),
        )
        .arg(
            Arg::new("password")
                .short('p')
                .long("password")
                .value_name("PASSWORD")
                .help("Database password for mysql/postgresql; prompts when given without a value")
                .num_args(0..=1)
                .require_equals(true),
        )
        .arg(
            Arg::new("player")
                .short('u')
                .long("player")
                .value_name("NAME")
                .help("Act as this configured player instead of the console"),
        )
        .arg(
            Arg::new("execute")
                .short('e')
                .long("execute")
                .value_name("COMMAND")
                .help("Run one command and exit"),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .value_name("LEVEL")
                .help("Log filter when RUST_LOG is unset")
                .default_value("warn"),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Only log errors")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let level = if matches.get_flag("quiet") {
        "error"
    } else {
        matches
            .get_one::<String>("log-level")
            .map(String::as_str)
            .unwrap_or("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(io::stderr)
        .init();

    let data_dir = matches
        .get_one::<String>("data-dir")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));

    let mut config = match matches.get_one::<String>("config") {
        Some(path) => Config::load(Path::new(path))?,
        None => {
            let default_path = data_dir.join("config.yml");
            if default_path.exists() {
                Config::load(&default_path)?
            } else {
                warn!(path = %default_path.display(), "no config file, using defaults");
                Config::default()
            }
        }
    };

    if let Some(kind) = matches.get_one::<String>("db-type") {
        config.database.kind = kind.clone();
    }

    if matches.contains_id("password") {
        let password = match matches.get_one::<String>("password") {
            Some(p) => p.clone(),
            None => {
                print!("Enter password: ");
                io::stdout().flush()?;
                rpassword::read_password().unwrap_or_default()
            }
        };
        match config.database.kind.parse::<BackendKind>() {
            Ok(BackendKind::MySql) => config.database.mysql.password = password,
            Ok(BackendKind::Postgres) => config.database.postgresql.password = password,
            _ => warn!("--password has no effect for this database type"),
        }
    }

    let player = matches.get_one::<String>("player").map(String::as_str);
    let session = Session::from_config(&config, player)
        .ok_or_else(|| anyhow::anyhow!("no configured player named '{}'", player.unwrap_or("")))?;

    let store = Arc::new(RankStore::open(&config.database, &data_dir)?);
    let players = Arc::new(StaticDirectory::from_config(&config));

    let mut cli = Cli::new(store, players, Arc::new(session))?;
    match matches.get_one::<String>("execute") {
        Some(command) => println!("{}", cli.execute(command)),
        None => cli.run()?,
    }

    Ok(())
}
