use std::fs::OpenOptions;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use herald_common::config::AppConfig;
use herald_notifier::TelegramNotifier;
use herald_watcher::client::StatusApiClient;
use herald_watcher::watcher::{StopReason, Watcher};

const EXIT_CONFIG: u8 = 2;
const EXIT_NOTIFIER_BROKEN: u8 = 3;

fn init_tracing(log_file: Option<PathBuf>) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "herald_watcher=debug,herald_notifier=debug,herald_common=info".into()
    });
    let builder = tracing_subscriber::fmt().with_env_filter(filter).json();

    match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(&path)?;
            builder.with_writer(Mutex::new(file)).with_ansi(false).init();
        }
        None => builder.init(),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let config = AppConfig::from_env();
    let log_file = match &config {
        Ok(config) => config.log_file.clone(),
        Err(_) => AppConfig::log_file_from_lookup(|key| std::env::var(key).ok()),
    };
    if let Err(e) = init_tracing(log_file) {
        eprintln!("Failed to open log file: {e}");
        return ExitCode::from(EXIT_CONFIG);
    }

    tracing::info!("Review Herald watcher starting...");

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Required configuration is missing, exiting");
            return ExitCode::from(EXIT_CONFIG);
        }
    };

    let clients = StatusApiClient::from_config(&config)
        .and_then(|source| Ok((source, TelegramNotifier::from_config(&config)?)));
    let (source, notifier) = match clients {
        Ok(clients) => clients,
        Err(e) => {
            tracing::error!(error = %e, "Failed to build HTTP clients");
            return ExitCode::from(EXIT_CONFIG);
        }
    };

    let mut watcher = Watcher::new(
        source,
        notifier,
        chrono::Utc::now().timestamp(),
        config.retry_period(),
    );

    // Run with graceful shutdown on Ctrl+C
    let code = tokio::select! {
        reason = watcher.run() => match reason {
            StopReason::NoItems => ExitCode::SUCCESS,
            StopReason::NotifierBroken => ExitCode::from(EXIT_NOTIFIER_BROKEN),
        },
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Received shutdown signal, stopping gracefully...");
            ExitCode::SUCCESS
        }
    };

    tracing::info!("Review Herald watcher stopped.");
    code
}
