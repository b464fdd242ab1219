use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "story-checker",
    about = "Review social profiles from a spreadsheet and log YES/NO verdicts",
    version,
    long_about = None
)]
pub struct Cli {
    /// Directory holding settings, session state, token and log file
    #[arg(long, env = "STORY_CHECKER_HOME", default_value = ".story_checker")]
    pub state_dir: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Interactive review session (default)
    Review,
    /// Set sheet identifiers and review options
    Configure(ConfigureArgs),
    /// Cache an access token and restore the account's settings
    Auth {
        /// Bearer token for the spreadsheet API
        #[arg(long)]
        token: String,
    },
    /// Forget the cached access token
    Logout,
    /// Manage profiles whose log rows carry their name instead of a URL
    Special {
        #[command(subcommand)]
        action: SpecialAction,
    },
    /// Print the profiles in the people sheet
    Profiles,
    /// Append today's date separator to the log sheet
    Separator,
    /// Print the editor link of a configured sheet
    SheetUrl {
        #[arg(value_enum, default_value = "log")]
        which: SheetKind,
    },
}

#[derive(clap::Args, Debug, Default, PartialEq, Eq)]
pub struct ConfigureArgs {
    /// People sheet id or link
    #[arg(long)]
    pub people_sheet: Option<String>,

    /// Log sheet id or link
    #[arg(long)]
    pub log_sheet: Option<String>,

    /// Profiles revealed per page
    #[arg(long)]
    pub page_size: Option<usize>,

    /// Pending profiles warmed ahead of the cursor
    #[arg(long)]
    pub lookahead: Option<usize>,

    /// Append NO verdicts to the log sheet as well
    #[arg(long)]
    pub log_no_choices: Option<bool>,

    /// How special profiles are logged
    #[arg(long, value_enum)]
    pub special_mode: Option<SpecialModeArg>,

    /// Delay between preload requests in milliseconds
    #[arg(long)]
    pub preload_gap_ms: Option<u64>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum SpecialAction {
    List,
    Add { name: String },
    Remove { name: String },
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SheetKind {
    People,
    Log,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpecialModeArg {
    NameInUrlColumn,
    NameOnly,
}
