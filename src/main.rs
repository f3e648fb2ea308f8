//! regpilot - course planning and registration autopilot
//!
//! Main entry point for the regpilot CLI.

mod cli;
mod cmd_classes;
mod cmd_run;
mod store;

use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use tracing::{debug, info, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use regpilot_config::{Config, ConfigLoader, ConfigValidator};

use cli::{Cli, Commands};
use cmd_classes::{handle_classes_command, handle_status_command};
use cmd_run::handle_run_command;
use store::Store;

/// Initialize console logging, plus a daily log file under `<storage>/logs`
/// when enabled.
fn init_tracing(config: &Config, storage_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    let console = fmt::layer().with_target(true).with_ansi(true);

    let file = if config.logging.file {
        let log_dir = storage_dir.join("logs");
        std::fs::create_dir_all(&log_dir)?;

        let file_appender = RollingFileAppender::builder()
            .rotation(Rotation::DAILY)
            .filename_prefix("regpilot")
            .filename_suffix("log")
            .max_log_files(30)
            .build(&log_dir)?;
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        // Keeps the background writer alive for the process lifetime.
        static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
            std::sync::OnceLock::new();
        let _ = GUARD.set(guard);

        Some(fmt::layer().with_writer(non_blocking).with_ansi(false))
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console)
        .with(file)
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config_path = cli.config.unwrap_or_else(ConfigLoader::default_path);
    let config = ConfigLoader::load_or_default(&config_path)?;
    let storage_dir = ConfigLoader::expand_path(&config.storage.dir);

    init_tracing(&config, &storage_dir)?;

    let validation = ConfigValidator::ensure_valid(&config)?;
    for warning in validation.warnings() {
        warn!("Config: {}", warning);
    }
    info!("regpilot v{} (config {})", env!("CARGO_PKG_VERSION"), config_path.display());

    let store = Arc::new(Store::new(&storage_dir));
    debug!("State file: {}", store.path().display());

    match cli.command {
        Commands::Classes { action } => handle_classes_command(action, &store).await,
        Commands::Status { clear } => handle_status_command(clear, &store).await,
        Commands::Run { workflow } => handle_run_command(workflow.into(), &config, store).await,
    }
}
