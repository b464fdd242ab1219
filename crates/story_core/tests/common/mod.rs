#![allow(dead_code)]

use std::sync::Once;

use story_core::{update, AppState, Effect, LoadMode, Msg, Profile, ReviewSettings};

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(story_logging::initialize_for_tests);
}

pub fn profile(i: usize) -> Profile {
    Profile::instagram(format!("Person {i}"), format!("https://instagram.com/p{i}"))
}

pub fn profiles(n: usize) -> Vec<Profile> {
    (0..n).map(profile).collect()
}

pub fn url(i: usize) -> String {
    format!("https://instagram.com/p{i}")
}

pub fn loaded(settings: ReviewSettings, n: usize) -> (AppState, Vec<Effect>) {
    update(
        AppState::with_settings(settings),
        Msg::ProfilesLoaded {
            mode: LoadMode::Fresh,
            profiles: profiles(n),
        },
    )
}

pub fn loaded_default(n: usize) -> AppState {
    loaded(ReviewSettings::default(), n).0
}

/// Fresh load followed by the first `next`, so profile 0 is open.
pub fn reviewing(n: usize) -> AppState {
    update(loaded_default(n), Msg::NextClicked).0
}

/// Runs a choice through the full request/confirm round trip.
pub fn decide(state: AppState, choice: story_core::Choice) -> (AppState, Vec<Effect>) {
    let (state, effects) = update(state, Msg::ChoiceMade(choice));
    let url = effects
        .iter()
        .find_map(|effect| match effect {
            Effect::LogChoice { profile, .. } => Some(profile.url.clone()),
            _ => None,
        })
        .expect("log effect");
    update(
        state,
        Msg::ChoiceLogged {
            url,
            choice,
            result: Ok(()),
        },
    )
}
