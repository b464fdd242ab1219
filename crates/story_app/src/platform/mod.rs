mod admin;
mod app;
mod commands;
mod effects;
pub mod logging;
mod persistence;
mod settings;
mod ui;

use std::sync::Arc;

use anyhow::Result;
use story_engine::{ensure_state_dir, EngineConfig, StateStore, TokenCache};

use crate::cli::{Cli, Command};
use settings::Settings;

pub fn run(cli: Cli) -> Result<()> {
    ensure_state_dir(&cli.state_dir)?;
    logging::initialize(&cli.state_dir, cli.verbose);
    let store = StateStore::new(cli.state_dir);

    match cli.command.unwrap_or(Command::Review) {
        Command::Review => app::run_review(store),
        Command::Configure(args) => admin::configure(&store, args),
        Command::Auth { token } => admin::auth(&store, &token),
        Command::Logout => admin::logout(&store),
        Command::Special { action } => admin::special(&store, action),
        Command::Profiles => admin::profiles(&store),
        Command::Separator => admin::separator(&store),
        Command::SheetUrl { which } => admin::sheet_url(&store, which),
    }
}

/// Engine setup shared by the review loop and the one-shot commands.
fn engine_config(store: &StateStore, settings: &Settings) -> Result<EngineConfig> {
    let mut config = EngineConfig::new(Arc::new(TokenCache::new(store.dir().to_path_buf())));
    config.people_sheet = settings.people_sheet_id()?;
    config.log_sheet = settings.log_sheet_id()?;
    config.policy = settings.log_policy();
    config.preload.gap = settings.preload_gap();
    Ok(config)
}
