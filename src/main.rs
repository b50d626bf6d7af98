mod action;
mod api;
mod app;
mod async_api;
mod cli;
mod components;
mod config;
mod event;
mod state;
mod theme;
mod tui;

use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::api::HttpBackend;
use crate::app::App;
use crate::cli::Cli;

fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        // Best-effort terminal restore so the user gets their shell back
        let _ = tui::restore();
        default_hook(panic_info);
    }));
}

/// Log to a file: the terminal belongs to the UI. `RUST_LOG` wins over
/// `level` unless `force` is set.
fn init_tracing(log_path: &Path, level: &str, force: bool) -> Result<()> {
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent).ok();
    }
    let file = File::options()
        .create(true)
        .append(true)
        .open(log_path)
        .with_context(|| format!("opening log file {}", log_path.display()))?;

    let filter = if force {
        EnvFilter::new(level)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .with(filter)
        .try_init()?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install().ok();
    install_panic_hook();

    let cli = Cli::parse();

    // Load config, apply CLI overrides
    let mut config = config::load_config(cli.config.as_deref());
    if let Some(ref server) = cli.server {
        config.server_url = server.trim_end_matches('/').to_string();
    }

    let log_path = cli.log_file.clone().unwrap_or_else(|| config.log_path());
    let level = if cli.debug {
        "debug".to_string()
    } else {
        config.log_level.clone().unwrap_or_else(|| "info".to_string())
    };
    init_tracing(&log_path, &level, cli.debug)?;

    if cli.save_server {
        config::save_settings(&config.path, &config.server_url)?;
        info!(server = %config.server_url, path = %config.path.display(), "saved server url");
    }

    info!(server = %config.server_url, "starting");
    let backend = HttpBackend::new(
        &config.server_url,
        Duration::from_secs(config.request_timeout_secs),
    )
    .with_context(|| format!("creating client for {}", config.server_url))?;

    let mut app = App::new(config, Arc::new(backend));

    let mut terminal = tui::init()?;
    let result = app.run(&mut terminal).await;
    tui::restore()?;

    if let Err(ref e) = result {
        eprintln!("workbench: {e:#}");
    }

    result
}
