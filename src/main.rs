//! # terminaltask
//!
//! An interactive task manager that lives in the terminal: browse, create,
//! edit, complete and delete tasks, with every change saved to a JSON file.
//!
//! ## Quick Start
//!
//! ```bash
//! # Start the session (tasks live in the config directory)
//! terminaltask
//!
//! # Use a specific task file
//! terminaltask --file ./todo.json
//!
//! # Shell completions
//! terminaltask --completions zsh > _terminaltask
//! ```
//!
//! The config directory is `$TERMINALTASK_CONFIG_DIR` when set, otherwise
//! `terminaltask` under the platform config directory. The session log is
//! written to `terminaltask.log` in the same place.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use terminaltask::cli::{print_completions, Cli};
use terminaltask::config::Config;
use terminaltask::logging::init_logging;
use terminaltask::service::{FileTaskService, TaskService};
use terminaltask::store::FileTaskStore;
use terminaltask::tui::run::run_tui;
use terminaltask::tui::theme::Theme;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(shell) = cli.completions {
        print_completions(shell);
        return Ok(());
    }

    let config = Config::load(cli.file).context("resolve configuration")?;
    let _log_guard = init_logging(&config.log_file, cli.log_level.as_deref())?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        tasks_file = %config.tasks_file.display(),
        "starting"
    );

    let store = FileTaskStore::new(&config.tasks_file);
    let service: Arc<dyn TaskService> = Arc::new(FileTaskService::new(store));
    let theme = if cli.no_color { Theme::plain() } else { Theme::default() };

    run_tui(service, theme).await
}
