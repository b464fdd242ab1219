use crate::navigator::Jump;
use crate::state::StatusKind;
use crate::{AppState, Choice, Effect, LoadMode, Msg, Profile, SearchOutcome, SessionSnapshot};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::SessionRestored(snapshot) => restore_session(&mut state, snapshot),
        Msg::SpecialProfilesLoaded(names) => {
            state.special = names.into_iter().collect();
            state.mark_dirty();
            Vec::new()
        }
        Msg::ProfilesLoaded { mode, profiles } => apply_profiles(&mut state, mode, profiles),
        Msg::ProfilesFailed { mode, error } => {
            // A failed background refresh keeps the restored window as is.
            if mode == LoadMode::Fresh {
                state.loading = false;
                state.set_status(StatusKind::Error, format!("Error: {error}"));
            }
            Vec::new()
        }
        Msg::ProfileSelected(idx) => state.select_profile(idx, Jump::User),
        Msg::NextClicked => match state.cursor {
            Some(idx) if idx + 1 < state.profiles.len() => {
                state.select_profile(idx + 1, Jump::User)
            }
            None if !state.profiles.is_empty() => state.select_profile(0, Jump::User),
            _ => Vec::new(),
        },
        Msg::PrevClicked => match state.cursor {
            Some(idx) if idx > 0 => state.select_profile(idx - 1, Jump::User),
            _ => Vec::new(),
        },
        Msg::BackClicked => state.go_back(),
        Msg::ChoiceMade(choice) => match state.current_profile().cloned() {
            Some(profile) => {
                let special = state.special.contains(&profile.name);
                state.set_status(StatusKind::Info, format!("Logging {choice}..."));
                vec![Effect::LogChoice {
                    profile,
                    choice,
                    special,
                }]
            }
            None => Vec::new(),
        },
        Msg::ChoiceLogged { url, choice, result } => match result {
            Ok(()) => {
                state.choices.insert(url.clone(), choice);
                state.set_status(StatusKind::Success, format!("{choice} logged"));
                let mut effects = vec![Effect::PersistChoices(state.choices.clone())];
                effects.extend(state.advance_after_choice(&url));
                effects
            }
            Err(error) => {
                state.set_status(StatusKind::Error, format!("Error: {error}"));
                Vec::new()
            }
        },
        Msg::LoadMoreClicked => {
            if state.load_next_page() {
                let text = format!("Loaded {}/{}", state.profiles.len(), state.all_profiles.len());
                state.set_status(StatusKind::Info, text);
                state.preload_effect().into_iter().collect()
            } else {
                state.set_status(StatusKind::Info, "No more profiles");
                Vec::new()
            }
        }
        Msg::SkipToggled(idx) => {
            if let Some(url) = state.profiles.get(idx).map(|p| p.url.clone()) {
                if state.skipped.remove(&url) {
                    state.set_status(StatusKind::Info, "Unskipped");
                } else {
                    state.skipped.insert(url);
                    state.set_status(StatusKind::Info, "Skipped");
                }
            }
            Vec::new()
        }
        Msg::SpecialToggled(idx) => match state.profiles.get(idx).map(|p| p.name.clone()) {
            Some(name) => {
                if state.special.remove(&name) {
                    state.set_status(StatusKind::Info, "Unmarked");
                } else {
                    state.special.insert(name);
                    state.set_status(StatusKind::Success, "Marked special");
                }
                vec![Effect::SaveSpecialProfiles(state.special_profiles())]
            }
            None => Vec::new(),
        },
        Msg::UndoClicked(idx) => match state.profiles.get(idx).map(|p| p.url.clone()) {
            Some(url) if state.choices.remove(&url).is_some() => {
                state.completed = false;
                state.set_status(StatusKind::Info, "Undone");
                vec![Effect::PersistChoices(state.choices.clone())]
            }
            Some(_) => {
                state.set_status(StatusKind::Info, "Nothing to undo");
                Vec::new()
            }
            None => Vec::new(),
        },
        Msg::RemoveClicked(idx) => remove_profile(&mut state, idx),
        Msg::FilterToggled(filter) => {
            if state.filter == Some(filter) {
                state.filter = None;
                state.apply_filter();
                state.set_status(StatusKind::Info, "Showing all");
            } else {
                state.filter = Some(filter);
                state.apply_filter();
                state.set_status(StatusKind::Info, format!("Showing {} only", filter.label()));
            }
            Vec::new()
        }
        Msg::ReloadClicked => {
            reset_progress(&mut state);
            state.loading = true;
            state.set_status(StatusKind::Info, "Loading...");
            vec![
                Effect::ForgetChoices,
                Effect::FetchProfiles {
                    mode: LoadMode::Fresh,
                },
            ]
        }
        Msg::ClearClicked => {
            reset_progress(&mut state);
            state.preloaded.clear();
            state.cursor = None;
            state.loading = true;
            state.set_status(StatusKind::Success, "Cleared! Starting fresh");
            vec![
                Effect::ForgetSession,
                Effect::FetchProfiles {
                    mode: LoadMode::Fresh,
                },
            ]
        }
        Msg::ReloadPageClicked => match state.current_profile() {
            Some(profile) => {
                let url = profile.url.clone();
                state.set_status(StatusKind::Info, "Reloading current page...");
                vec![Effect::OpenProfile { url }]
            }
            None => {
                state.set_status(StatusKind::Error, "No profile selected");
                Vec::new()
            }
        },
        Msg::CopyYesLinksClicked => {
            let links: Vec<String> = state
                .all_profiles
                .iter()
                .filter(|p| state.choices.get(&p.url) == Some(&Choice::Yes))
                .map(|p| p.url.clone())
                .collect();
            if links.is_empty() {
                state.set_status(StatusKind::Info, "No YES links");
                Vec::new()
            } else {
                state.set_status(StatusKind::Success, format!("Copied {} links", links.len()));
                vec![Effect::ExportLinks(links)]
            }
        }
        Msg::ProfileOpened { url, result } => {
            match result {
                Ok(()) => {
                    state.preloaded.insert(url);
                    state.mark_dirty();
                }
                Err(error) => {
                    state.set_status(StatusKind::Error, format!("Could not open {url}: {error}"));
                }
            }
            Vec::new()
        }
        Msg::PreloadFinished { url } => {
            if state.preloaded.insert(url) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::SearchModeToggled => toggle_search_mode(&mut state),
        Msg::SearchRequested(name) => {
            let name = name.trim().to_string();
            if name.is_empty() {
                return (state, Vec::new());
            }
            state.search.name = name.clone();
            state.search.total = 0;
            state.search.current = 0;
            state.search.location = None;
            state.set_status(StatusKind::Info, format!("Searching for \"{name}\"..."));
            vec![Effect::SearchName { name }]
        }
        Msg::SearchNextClicked => vec![Effect::SearchNext],
        Msg::SearchPrevClicked => vec![Effect::SearchPrev],
        Msg::SearchFinished(outcome) => {
            apply_search_outcome(&mut state, outcome);
            Vec::new()
        }
    };

    (state, effects)
}

fn restore_session(state: &mut AppState, snapshot: Option<SessionSnapshot>) -> Vec<Effect> {
    match snapshot {
        Some(snapshot) if !snapshot.profiles.is_empty() => {
            state.all_profiles = snapshot.profiles.clone();
            state.profiles = snapshot.profiles;
            state.page = snapshot.page;
            state.preloaded = snapshot.preloaded.into_iter().collect();
            state.skipped = snapshot.skipped.into_iter().collect();
            state.choices = snapshot.choices;
            let len = state.profiles.len();
            state.history = snapshot.history.into_iter().filter(|&i| i < len).collect();
            match snapshot.cursor {
                Some(idx) if idx < len => {
                    state.select_profile(idx, Jump::Quiet);
                }
                _ => state.clamp_cursor(),
            }
            state.set_status(StatusKind::Success, "Session restored");
            vec![Effect::FetchProfiles {
                mode: LoadMode::Reconcile,
            }]
        }
        _ => {
            state.choices.clear();
            state.loading = true;
            state.set_status(StatusKind::Info, "Loading...");
            vec![
                Effect::ForgetChoices,
                Effect::FetchProfiles {
                    mode: LoadMode::Fresh,
                },
            ]
        }
    }
}

fn apply_profiles(state: &mut AppState, mode: LoadMode, profiles: Vec<Profile>) -> Vec<Effect> {
    match mode {
        LoadMode::Fresh => {
            let count = profiles.len();
            state.all_profiles = profiles;
            state.page = 0;
            state.preloaded.clear();
            state.filter = None;
            state.completed = false;
            state.loading = false;
            state.apply_filter();
            state.set_status(StatusKind::Success, format!("Loaded {count} profiles"));
            state.preload_effect().into_iter().collect()
        }
        LoadMode::Reconcile => {
            state.all_profiles = profiles;
            state.mark_dirty();
            Vec::new()
        }
    }
}

fn remove_profile(state: &mut AppState, idx: usize) -> Vec<Effect> {
    if idx >= state.profiles.len() {
        return Vec::new();
    }
    let removed = state.profiles.remove(idx);
    state.all_profiles.retain(|p| p.url != removed.url);
    state.choices.remove(&removed.url);
    state.skipped.remove(&removed.url);
    state.preloaded.remove(&removed.url);
    state.history = state
        .history
        .iter()
        .filter(|&&i| i != idx)
        .map(|&i| if i > idx { i - 1 } else { i })
        .collect();
    if let Some(cursor) = state.cursor {
        if cursor > idx {
            state.cursor = Some(cursor - 1);
        }
    }
    state.clamp_cursor();
    state.set_status(StatusKind::Success, "Removed");
    vec![Effect::PersistChoices(state.choices.clone())]
}

fn reset_progress(state: &mut AppState) {
    state.choices.clear();
    state.skipped.clear();
    state.history.clear();
    state.filter = None;
    state.completed = false;
    state.search = Default::default();
}

fn toggle_search_mode(state: &mut AppState) -> Vec<Effect> {
    if state.search.active {
        state.search = Default::default();
        state.filter = None;
        state.apply_filter();
        state.set_status(StatusKind::Info, "Exited Search Mode");
        vec![Effect::ClearSearch]
    } else {
        state.search = Default::default();
        state.search.active = true;
        state.filter = Some(crate::Filter::Yes);
        state.apply_filter();
        state.set_status(
            StatusKind::Info,
            "Search Mode: select a YES profile to find it in the log sheet",
        );
        Vec::new()
    }
}

fn apply_search_outcome(state: &mut AppState, outcome: SearchOutcome) {
    if outcome.found {
        state.search.total = outcome.total;
        state.search.current = outcome.current;
        state.search.location = outcome.location;
        let text = match outcome.location {
            Some(cell) => format!("Match {} of {} at {cell}", outcome.current, outcome.total),
            None => format!("Match {} of {}", outcome.current, outcome.total),
        };
        state.set_status(StatusKind::Success, text);
    } else {
        state.search.total = 0;
        state.search.current = 0;
        state.search.location = None;
        let text = outcome
            .message
            .unwrap_or_else(|| "No matches found".to_string());
        state.set_status(StatusKind::Info, text);
    }
}
