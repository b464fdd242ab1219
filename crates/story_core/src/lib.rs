//! Story checker core: pure review state machine and view-model helpers.
mod effect;
mod msg;
mod navigator;
mod profile;
mod search;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::Msg;
pub use profile::{parse_profile_table, shorten_url, Choice, Platform, Profile, SourceError};
pub use search::{CellRef, MatchCursor, SearchOutcome};
pub use state::{
    AppState, Filter, LoadMode, ReviewSettings, SearchState, SessionSnapshot, StatusKind,
    StatusMessage, DEFAULT_LOOKAHEAD, DEFAULT_PAGE_SIZE,
};
pub use update::update;
pub use view_model::{AppViewModel, CurrentProfileView, ProfileRowView, StatsView};
