use std::fs::{self, File};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use cagent_core::{Config, HttpBackend, ViewController};
use clap::Parser;

mod app;
mod handler;
mod tui;
mod ui;

use app::App;
use tui::EventHandler;

#[derive(Parser)]
#[command(name = "cagent")]
#[command(about = "Terminal client for the C Agent learning assistant")]
struct Cli {
    /// Server base URL (overrides the config file)
    #[arg(short, long)]
    server: Option<String>,
    /// Path to the config file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

/// Logs go to a file; the terminal belongs to the UI
fn init_logging() -> Result<PathBuf> {
    let log_dir = dirs::cache_dir()
        .ok_or_else(|| anyhow!("Could not determine cache directory"))?
        .join("cagent");
    fs::create_dir_all(&log_dir)?;
    let log_path = log_dir.join("cagent.log");
    let file = File::create(&log_path)
        .with_context(|| format!("creating log file {}", log_path.display()))?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(log_path)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_path = init_logging()?;

    let config_path = match cli.config {
        Some(path) => path,
        None => Config::default_path()?,
    };
    let mut config = Config::load_from(&config_path)
        .with_context(|| format!("loading config from {}", config_path.display()))?;
    if let Some(server) = cli.server {
        config.server_url = server;
    }

    let backend = match config.request_timeout_secs {
        Some(secs) => HttpBackend::with_timeout(&config.server_url, Duration::from_secs(secs))?,
        None => HttpBackend::new(&config.server_url),
    };
    log::info!(
        "starting against {} (logging to {})",
        backend.base_url(),
        log_path.display()
    );

    let controller = ViewController::new(backend, config, Some(config_path));

    // Setup terminal
    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut events = EventHandler::new();
    let mut app = App::new(controller, events.sender());

    app.controller.initialize().await;

    // Main loop
    let result = async {
        loop {
            terminal.draw(|frame| ui::render(&mut app, frame))?;

            let Some(event) = events.next().await else {
                break;
            };
            if let Err(e) = handler::handle_event(&mut app, event) {
                log::error!("event handling failed: {:#}", e);
                app.controller.report_unexpected(&e);
            }

            if app.should_quit {
                break;
            }
        }
        Ok::<(), anyhow::Error>(())
    }
    .await;

    tui::restore()?;
    result
}
