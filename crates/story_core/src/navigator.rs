//! Cursor movement over the loaded profile window.

use std::collections::HashSet;

use crate::state::StatusKind;
use crate::{AppState, Choice, Effect, Filter, Profile};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Jump {
    /// Operator-initiated: records history and opens the page.
    User,
    /// Restore or re-render: moves the cursor only.
    Quiet,
}

impl AppState {
    pub(crate) fn select_profile(&mut self, idx: usize, jump: Jump) -> Vec<Effect> {
        if idx >= self.profiles.len() {
            return Vec::new();
        }
        if jump == Jump::User {
            if let Some(prev) = self.cursor {
                if prev != idx {
                    self.history.push(prev);
                }
            }
        }
        self.cursor = Some(idx);
        self.mark_dirty();

        if jump == Jump::Quiet {
            return Vec::new();
        }
        let mut effects = vec![self.open_or_search(idx)];
        effects.extend(self.preload_effect());
        effects
    }

    pub(crate) fn go_back(&mut self) -> Vec<Effect> {
        let Some(prev) = self.history.pop() else {
            self.set_status(StatusKind::Info, "No history");
            return Vec::new();
        };
        self.select_profile(prev, Jump::Quiet);
        self.set_status(StatusKind::Info, "Went back");
        match self.profiles.get(prev) {
            Some(profile) => vec![Effect::OpenProfile {
                url: profile.url.clone(),
            }],
            None => Vec::new(),
        }
    }

    /// Moves past the profile that was just decided, skipping skipped entries
    /// and pulling in further pages when the loaded window runs out.
    pub(crate) fn advance_after_choice(&mut self, url: &str) -> Vec<Effect> {
        let Some(idx) = self.position_of(url) else {
            return Vec::new();
        };
        let mut next = idx + 1;
        loop {
            while next < self.profiles.len() && self.skipped.contains(&self.profiles[next].url) {
                next += 1;
            }
            if next < self.profiles.len() {
                return self.select_profile(next, Jump::User);
            }
            if !self.load_next_page() {
                break;
            }
        }
        // A filtered or partly decided window can run out with work left.
        let pending = self.stats().pending;
        if pending == 0 {
            self.completed = true;
            self.set_status(StatusKind::Success, "All profiles checked");
        } else if self.filter.is_some() {
            self.set_status(StatusKind::Info, "End of filtered list");
        } else {
            self.set_status(StatusKind::Info, format!("End of list, {pending} pending"));
        }
        Vec::new()
    }

    pub(crate) fn open_or_search(&mut self, idx: usize) -> Effect {
        let profile = &self.profiles[idx];
        if self.search.active {
            let name = profile.name.clone();
            self.search.name = name.clone();
            self.search.total = 0;
            self.search.current = 0;
            self.search.location = None;
            Effect::SearchName { name }
        } else {
            Effect::OpenProfile {
                url: profile.url.clone(),
            }
        }
    }

    /// Next pending profiles from the cursor that have not been warmed yet.
    pub(crate) fn preload_effect(&self) -> Option<Effect> {
        let start = self.cursor.unwrap_or(0);
        let urls: Vec<String> = self
            .profiles
            .iter()
            .skip(start)
            .filter(|p| {
                !self.preloaded.contains(&p.url)
                    && !self.choices.contains_key(&p.url)
                    && !self.skipped.contains(&p.url)
            })
            .take(self.settings.lookahead)
            .map(|p| p.url.clone())
            .collect();
        if urls.is_empty() {
            None
        } else {
            Some(Effect::Preload { urls })
        }
    }

    pub(crate) fn has_more_pages(&self) -> bool {
        if self.filter.is_some() {
            return false;
        }
        let loaded: HashSet<&str> = self.profiles.iter().map(|p| p.url.as_str()).collect();
        self.all_profiles
            .iter()
            .any(|p| !loaded.contains(p.url.as_str()))
    }

    /// Appends the next page of not-yet-loaded profiles from the full source.
    pub(crate) fn load_next_page(&mut self) -> bool {
        if self.filter.is_some() {
            return false;
        }
        let loaded: HashSet<&str> = self.profiles.iter().map(|p| p.url.as_str()).collect();
        let extra: Vec<Profile> = self
            .all_profiles
            .iter()
            .filter(|p| !loaded.contains(p.url.as_str()))
            .take(self.settings.page_size)
            .cloned()
            .collect();
        if extra.is_empty() {
            return false;
        }
        self.page += 1;
        self.profiles.extend(extra);
        self.mark_dirty();
        true
    }

    /// Rebuilds the loaded window for the active filter.
    pub(crate) fn apply_filter(&mut self) {
        self.profiles = match self.filter {
            None => self
                .all_profiles
                .iter()
                .take(self.settings.page_size * (self.page + 1))
                .cloned()
                .collect(),
            Some(Filter::Yes) => self.profiles_with_choice(Choice::Yes),
            Some(Filter::No) => self.profiles_with_choice(Choice::No),
            Some(Filter::Pending) => self
                .all_profiles
                .iter()
                .filter(|p| !self.choices.contains_key(&p.url) && !self.skipped.contains(&p.url))
                .cloned()
                .collect(),
        };
        // Indices from the previous window no longer point at the same profiles.
        self.history.clear();
        self.clamp_cursor();
        self.mark_dirty();
    }

    pub(crate) fn clamp_cursor(&mut self) {
        self.cursor = match (self.profiles.len(), self.cursor) {
            (0, _) | (_, None) => None,
            (len, Some(idx)) => Some(idx.min(len - 1)),
        };
    }

    fn profiles_with_choice(&self, choice: Choice) -> Vec<Profile> {
        self.all_profiles
            .iter()
            .filter(|p| self.choices.get(&p.url) == Some(&choice))
            .cloned()
            .collect()
    }
}
