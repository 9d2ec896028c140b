//! LightBnB command line
//!
//! Runs a single data-access operation against the LightBnB database and
//! prints the result as JSON.

use clap::Parser;
use lb_core::config::{AppConfig, LoggingConfig};
use lb_core::{LbError, LbResult};
use lb_db::{Database, DatabaseConfig};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::Command;

#[derive(Debug, Parser)]
#[command(name = "lightbnb")]
#[command(about = "LightBnB data access from the command line")]
struct Cli {
    /// Configuration file (toml, yaml or json)
    #[arg(long, env = "LIGHTBNB_CONFIG")]
    config: Option<String>,

    /// Overrides the configured database URL
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref(), cli.database_url) {
        Ok(config) => config,
        Err(e) => fail(&e),
    };

    init_tracing(&config.logging);
    info!(version = env!("CARGO_PKG_VERSION"), "Starting LightBnB CLI");

    let db = match Database::connect(&DatabaseConfig::from_settings(&config.database)).await {
        Ok(db) => db,
        Err(e) => fail(&LbError::Database(e.to_string())),
    };
    let outcome = commands::run(cli.command, &db).await;
    db.close().await;

    match outcome {
        Ok(value) => {
            println!("{}", serde_json::to_string_pretty(&value)?);
            Ok(())
        }
        Err(e) => fail(&e),
    }
}

/// Read the config file when one is given, the environment otherwise, then
/// apply the command line URL override
fn load_config(path: Option<&str>, database_url: Option<String>) -> LbResult<AppConfig> {
    let mut config = match path {
        Some(path) => AppConfig::from_file(path)?,
        None => AppConfig::from_env()?,
    };
    if let Some(url) = database_url {
        config.database.url = url;
    }
    Ok(config)
}

/// Report `err` on stderr and exit with its status code
fn fail(err: &LbError) -> ! {
    tracing::error!(code = err.error_code(), "{}", err);
    eprintln!("{}", error_body(err));
    std::process::exit(err.exit_code());
}

/// Initialize tracing/logging on stderr so stdout stays machine readable
fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("{},sqlx=warn", logging.level).into());

    let json_layer = logging.json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
    });
    let text_layer = (!logging.json).then(|| {
        tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_writer(std::io::stderr)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}

fn error_body(err: &LbError) -> serde_json::Value {
    serde_json::json!({
        "error": err.error_code(),
        "message": err.to_string(),
    })
}
