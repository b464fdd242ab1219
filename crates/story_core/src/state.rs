use std::collections::{BTreeMap, BTreeSet};

use crate::search::CellRef;
use crate::view_model::{AppViewModel, CurrentProfileView, ProfileRowView, StatsView};
use crate::{Choice, Profile};

pub const DEFAULT_PAGE_SIZE: usize = 20;
pub const DEFAULT_LOOKAHEAD: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewSettings {
    /// Profiles revealed per page of the loaded window.
    pub page_size: usize,
    /// Pending profiles warmed ahead of the cursor.
    pub lookahead: usize,
}

impl Default for ReviewSettings {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            lookahead: DEFAULT_LOOKAHEAD,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter {
    Yes,
    No,
    Pending,
}

impl Filter {
    pub fn label(self) -> &'static str {
        match self {
            Filter::Yes => "YES",
            Filter::No => "NO",
            Filter::Pending => "Pending",
        }
    }
}

/// How a fetched profile list is applied to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMode {
    /// Replace the loaded window with the first page.
    Fresh,
    /// Refresh the full source behind a restored window.
    Reconcile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchState {
    pub active: bool,
    pub name: String,
    pub total: usize,
    pub current: usize,
    pub location: Option<CellRef>,
}

/// Navigation progress saved between runs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionSnapshot {
    pub profiles: Vec<Profile>,
    pub cursor: Option<usize>,
    pub page: usize,
    pub preloaded: Vec<String>,
    pub skipped: Vec<String>,
    pub history: Vec<usize>,
    pub choices: BTreeMap<String, Choice>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    pub(crate) settings: ReviewSettings,
    pub(crate) all_profiles: Vec<Profile>,
    pub(crate) profiles: Vec<Profile>,
    pub(crate) cursor: Option<usize>,
    pub(crate) page: usize,
    pub(crate) choices: BTreeMap<String, Choice>,
    pub(crate) skipped: BTreeSet<String>,
    pub(crate) preloaded: BTreeSet<String>,
    pub(crate) history: Vec<usize>,
    pub(crate) special: BTreeSet<String>,
    pub(crate) filter: Option<Filter>,
    pub(crate) search: SearchState,
    pub(crate) completed: bool,
    pub(crate) loading: bool,
    pub(crate) status: Option<StatusMessage>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: ReviewSettings) -> Self {
        Self {
            settings: ReviewSettings {
                page_size: settings.page_size.max(1),
                lookahead: settings.lookahead,
            },
            ..Self::default()
        }
    }

    pub fn settings(&self) -> ReviewSettings {
        self.settings
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn current_profile(&self) -> Option<&Profile> {
        self.cursor.and_then(|idx| self.profiles.get(idx))
    }

    pub fn choices(&self) -> &BTreeMap<String, Choice> {
        &self.choices
    }

    pub fn is_skipped(&self, url: &str) -> bool {
        self.skipped.contains(url)
    }

    pub fn is_preloaded(&self, url: &str) -> bool {
        self.preloaded.contains(url)
    }

    pub fn is_special(&self, name: &str) -> bool {
        self.special.contains(name)
    }

    pub fn special_profiles(&self) -> Vec<String> {
        self.special.iter().cloned().collect()
    }

    pub fn history(&self) -> &[usize] {
        &self.history
    }

    pub fn session_snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            profiles: self.profiles.clone(),
            cursor: self.cursor,
            page: self.page,
            preloaded: self.preloaded.iter().cloned().collect(),
            skipped: self.skipped.iter().cloned().collect(),
            history: self.history.clone(),
            choices: self.choices.clone(),
        }
    }

    pub fn view(&self) -> AppViewModel {
        let rows = self
            .profiles
            .iter()
            .enumerate()
            .map(|(index, profile)| ProfileRowView {
                index,
                number: self
                    .all_profiles
                    .iter()
                    .position(|p| p.url == profile.url)
                    .map_or(index + 1, |pos| pos + 1),
                name: profile.name.clone(),
                platform: profile.platform,
                url: profile.url.clone(),
                short_url: crate::shorten_url(&profile.url),
                choice: self.choices.get(&profile.url).copied(),
                skipped: self.skipped.contains(&profile.url),
                special: self.special.contains(&profile.name),
                preloaded: self.preloaded.contains(&profile.url),
                active: self.cursor == Some(index),
            })
            .collect();

        let current = self.current_profile().map(|profile| CurrentProfileView {
            name: profile.name.clone(),
            platform: profile.platform,
            url: profile.url.clone(),
            choice: self.choices.get(&profile.url).copied(),
        });

        let stats = self.stats();
        AppViewModel {
            rows,
            current,
            completed: self.completed || (stats.total > 0 && stats.pending == 0),
            stats,
            position: self.cursor.map_or(0, |idx| idx + 1),
            source_len: self.all_profiles.len(),
            filter: self.filter,
            can_go_back: !self.history.is_empty(),
            can_load_more: self.has_more_pages(),
            search: self.search.clone(),
            status: self.status.clone(),
            loading: self.loading,
            dirty: self.dirty,
        }
    }

    pub(crate) fn stats(&self) -> StatsView {
        let active: Vec<&Profile> = self
            .all_profiles
            .iter()
            .filter(|p| !self.skipped.contains(&p.url))
            .collect();
        let total = active.len();
        let yes = active
            .iter()
            .filter(|p| self.choices.get(&p.url) == Some(&Choice::Yes))
            .count();
        let no = active
            .iter()
            .filter(|p| self.choices.get(&p.url) == Some(&Choice::No))
            .count();
        let checked = yes + no;
        let percent = if total > 0 {
            ((checked as f64 / total as f64) * 100.0).round() as u8
        } else {
            0
        };
        StatsView {
            yes,
            no,
            pending: total - checked,
            total,
            percent,
        }
    }

    pub(crate) fn position_of(&self, url: &str) -> Option<usize> {
        self.profiles.iter().position(|p| p.url == url)
    }

    pub(crate) fn set_status(&mut self, kind: StatusKind, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            kind,
            text: text.into(),
        });
        self.mark_dirty();
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Returns whether a re-render is due and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}
