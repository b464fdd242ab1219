//! Logging initialization for the story checker.
//!
//! Warnings go to the terminal; everything at the chosen level goes to
//! `<state_dir>/story_checker.log`.

use std::fs::OpenOptions;
use std::path::Path;

use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};
use story_logging::level_for;

pub const LOG_FILENAME: &str = "story_checker.log";

/// Initialize the combined terminal and file logger.
///
/// The file logger is skipped, with a warning on stderr, if the log file
/// cannot be opened.
pub fn initialize(state_dir: &Path, verbose: bool) {
    let config = build_config();
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        LevelFilter::Warn,
        config.clone(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )];
    if let Some(file_logger) = create_file_logger(state_dir, level_for(verbose), config) {
        loggers.push(file_logger);
    }

    let _ = CombinedLogger::init(loggers);
}

fn build_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build()
}

fn create_file_logger(
    state_dir: &Path,
    level: LevelFilter,
    config: Config,
) -> Option<Box<WriteLogger<std::fs::File>>> {
    let log_path = state_dir.join(LOG_FILENAME);
    if let Err(err) = story_engine::ensure_state_dir(state_dir) {
        eprintln!("Warning: Could not create state dir {:?}: {}", state_dir, err);
        return None;
    }
    match OpenOptions::new().create(true).append(true).open(&log_path) {
        Ok(file) => Some(WriteLogger::new(level, config, file)),
        Err(err) => {
            eprintln!("Warning: Could not open log file at {:?}: {}", log_path, err);
            None
        }
    }
}
