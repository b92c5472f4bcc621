use std::fs::{self, File};
use std::sync::{Arc, Mutex};

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use touchline::app::AppContext;
use touchline::cli::{commands, Cli, Commands};
use touchline::config::{Config, SettingsHandle};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let command = cli.command.as_ref().unwrap_or(&Commands::Tui);

    init_tracing(matches!(command, Commands::Tui));

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let settings = cli.feed_settings(&config);
    let ctx = AppContext::new(config)?;

    match command {
        Commands::List { json } => {
            commands::list_articles(&ctx, &settings, *json).await?;
        }
        Commands::Url => {
            commands::print_url(&ctx, &settings)?;
        }
        Commands::Tui => {
            touchline::tui::run(Arc::new(ctx), SettingsHandle::new(settings)).await?;
        }
    }

    Ok(())
}

/// Log to stderr, or to a file while the TUI owns the terminal.
fn init_tracing(tui: bool) {
    let registry = tracing_subscriber::registry().with(EnvFilter::from_default_env());

    if tui {
        match open_log_file() {
            Some(file) => registry
                .with(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
                .init(),
            None => registry.init(),
        }
    } else {
        registry.with(fmt::layer().with_writer(std::io::stderr)).init();
    }
}

fn open_log_file() -> Option<File> {
    let dir = dirs::cache_dir()?.join("touchline");
    fs::create_dir_all(&dir).ok()?;
    fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("touchline.log"))
        .ok()
}
