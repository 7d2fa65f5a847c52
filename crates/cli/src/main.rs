//! Nauan admin CLI - content moderation from the terminal

mod commands;
mod logging;
mod render;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use commands::Commands;
use nauan_client::{ApiClient, FileTokenStore, ModerationApi, Session, SessionListener, Settings};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{Level, error, info};

#[derive(Parser)]
#[command(name = "nauan-admin")]
#[command(about = "Moderate recipes, tips and reported content")]
#[command(version)]
struct Cli {
    /// Set logging level
    #[arg(short = 'l', long, global = true, default_value = "warn")]
    log_level: LogLevel,

    /// Data directory for the stored token, config and logs
    #[arg(short = 'd', long, global = true)]
    data_dir: Option<PathBuf>,

    /// Configuration file (defaults to <data-dir>/nauan.toml)
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    /// Disable file logging (only log to stderr)
    #[arg(long, global = true)]
    no_file_log: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Tells the operator the session is over
struct NoticeListener;

impl SessionListener for NoticeListener {
    fn session_ended(&self) {
        eprintln!("Your session has ended. Run `nauan-admin signin` to continue.");
    }
}

fn resolve_data_dir(data_dir: Option<PathBuf>) -> PathBuf {
    data_dir.unwrap_or_else(|| {
        if let Ok(state_dir) = std::env::var("NAUAN_STATE_DIR") {
            PathBuf::from(state_dir)
        } else {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("nauan")
        }
    })
}

fn build_api(data_dir: &Path, config: Option<PathBuf>) -> Result<ModerationApi> {
    let config_path = config.unwrap_or_else(|| data_dir.join("nauan.toml"));
    let settings = Settings::load(config_path.exists().then_some(config_path.as_path()))?;

    let store = FileTokenStore::in_dir(data_dir, settings.storage_key.clone());
    info!(path = %store.path().display(), "Using token store");
    let session = Arc::new(Session::new(Arc::new(store)));
    let client = ApiClient::from_settings(&settings, session)?;

    Ok(ModerationApi::new(client, Arc::new(NoticeListener)))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let data_dir = resolve_data_dir(cli.data_dir);

    logging::init_logging(cli.log_level.into(), &data_dir, cli.no_file_log)?;

    let result = async {
        let api = build_api(&data_dir, cli.config)?;
        cli.command.execute(api).await
    };

    if let Err(e) = result.await {
        error!("Command failed: {e:#}");
        std::process::exit(1);
    }

    Ok(())
}

#[derive(Clone, Debug, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for Level {
    fn from(log_level: LogLevel) -> Self {
        match log_level {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}
