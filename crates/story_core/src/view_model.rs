use crate::{Choice, Filter, Platform, SearchState, StatusMessage};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatsView {
    pub yes: usize,
    pub no: usize,
    pub pending: usize,
    /// Profiles in the source minus skipped ones.
    pub total: usize,
    pub percent: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub rows: Vec<ProfileRowView>,
    pub current: Option<CurrentProfileView>,
    pub stats: StatsView,
    /// One-based cursor position; 0 when nothing is selected.
    pub position: usize,
    pub source_len: usize,
    pub filter: Option<Filter>,
    pub can_go_back: bool,
    pub can_load_more: bool,
    pub completed: bool,
    pub search: SearchState,
    pub status: Option<StatusMessage>,
    pub loading: bool,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileRowView {
    pub index: usize,
    /// One-based position in the full source.
    pub number: usize,
    pub name: String,
    pub platform: Platform,
    pub url: String,
    pub short_url: String,
    pub choice: Option<Choice>,
    pub skipped: bool,
    pub special: bool,
    pub preloaded: bool,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentProfileView {
    pub name: String,
    pub platform: Platform,
    pub url: String,
    pub choice: Option<Choice>,
}
