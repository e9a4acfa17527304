//! geoconnector: process entry point for the geospatial data API.
//!
//! # Responsibility
//! - Resolve configuration from flags and environment.
//! - Initialize logging and open (and migrate) the database.
//! - Dispatch `serve`, `create-user` and `migrate`.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use geoconnector_api::{serve, AppState};
use geoconnector_core::db::migrations::{latest_version, schema_version};
use geoconnector_core::repo::account_repo::SqliteAccountRepository;
use geoconnector_core::{default_log_level, init_logging, open_db, AuthService, LogTarget};
use log::info;

#[derive(Parser)]
#[command(name = "geoconnector")]
#[command(about = "Geospatial locations, points and resource links over HTTP", version)]
struct Cli {
    /// SQLite database file
    #[arg(long, env = "GEOCONNECTOR_DB", default_value = "geoconnector.sqlite3")]
    db: PathBuf,

    /// Log level (trace|debug|info|warn|error)
    #[arg(long, env = "GEOCONNECTOR_LOG_LEVEL")]
    log_level: Option<String>,

    /// Absolute directory for rotating log files; logs go to stderr when unset
    #[arg(long, env = "GEOCONNECTOR_LOG_DIR")]
    log_dir: Option<String>,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or(default_log_level())
    }
}

#[derive(Subcommand)]
enum Command {
    /// Serve the HTTP API
    Serve {
        /// Socket address to listen on
        #[arg(long, env = "GEOCONNECTOR_BIND", default_value = "127.0.0.1:8000")]
        bind: SocketAddr,
    },
    /// Create an API account
    CreateUser {
        username: String,

        #[arg(long, env = "GEOCONNECTOR_PASSWORD")]
        password: String,
    },
    /// Apply pending schema migrations and exit
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let target = LogTarget::from_dir(cli.log_dir.as_deref()).map_err(|err| anyhow!(err))?;
    init_logging(cli.log_level(), target).map_err(|err| anyhow!(err))?;

    let conn = open_db(&cli.db)
        .with_context(|| format!("failed to open database `{}`", cli.db.display()))?;

    match cli.command {
        Command::Serve { bind } => {
            serve(AppState::shared(conn), bind)
                .await
                .context("server terminated with an error")?;
        }
        Command::CreateUser { username, password } => {
            let account = AuthService::new(SqliteAccountRepository::new(&conn))
                .register(&username, &password)
                .context("failed to create account")?;
            info!(
                "event=cli_create_user module=cli status=ok account_id={}",
                account.id
            );
            println!("created account `{}` (id {})", account.username, account.id);
        }
        Command::Migrate => {
            let version = schema_version(&conn).context("failed to read schema version")?;
            info!(
                "event=cli_migrate module=cli status=ok schema_version={version} latest={}",
                latest_version()
            );
            println!(
                "database `{}` is at schema version {version}",
                cli.db.display()
            );
        }
    }

    Ok(())
}
