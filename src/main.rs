//! Book Finder: search Open Library by title or author from a TUI, a plain
//! CLI, or a small local web page.
//!
//! Code map (reading entry points):
//! - `base_system`: config / logging infrastructure
//! - `openlibrary`: search request building, response mapping, HTTP client
//! - `search`: the controller state machine shared by every UI
//! - `ui`: TUI (default), plain CLI (`old_cli`) and web (`--server`)

use std::path::PathBuf;

use anyhow::{Result, anyhow};
use clap::Parser;
use tracing::info;

mod base_system;
mod openlibrary;
mod search;
mod ui;

use base_system::config::{ConfigSpec, load_or_create};
use base_system::context::Config;
use base_system::logging::{LogOptions, LogSystem};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Parser)]
#[command(name = "book-finder")]
#[command(about = "Book Finder (Open Library search TUI)")]
struct Cli {
    /// Enable debug logging
    #[arg(long, default_value_t = false)]
    debug: bool,

    /// Serve the web UI instead of starting the TUI
    #[arg(long, default_value_t = false)]
    server: bool,

    /// Show version information and exit
    #[arg(long, default_value_t = false)]
    version: bool,

    /// Data directory for config.yml and logs (handy for containers)
    #[arg(long)]
    data_dir: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.version {
        println!("Book Finder v{VERSION}");
        return Ok(());
    }

    let data_dir = cli.data_dir.as_ref().map(std::path::Path::new);
    let log_opts = LogOptions {
        debug: cli.debug,
        console: false,
        broadcast_to_ui: true,
        archive_on_exit: true,
    };
    let _log = LogSystem::init(log_opts, data_dir).map_err(|e| anyhow!(e))?;

    let mut config: Config =
        load_or_create(None, data_dir).map_err(|e| anyhow!(e.to_string()))?;
    let config_path = data_dir
        .map(|d| d.join(Config::FILE_NAME))
        .unwrap_or_else(|| PathBuf::from(Config::FILE_NAME));

    if cli.server {
        return ui::web::run(&config);
    }

    loop {
        if config.old_cli {
            info!(target: "startup", "Book Finder v{VERSION} (plain CLI)");
            return ui::noui::run(&mut config);
        }

        match ui::tui::run(config.clone(), config_path.clone())? {
            ui::tui::TuiExit::Quit => return Ok(()),
            ui::tui::TuiExit::SwitchToOldCli => {
                // Simulated restart: reload the config from disk, then enter
                // the plain CLI.
                config = load_or_create(None, data_dir).map_err(|e| anyhow!(e.to_string()))?;
                config.old_cli = true;
            }
        }
    }
}
