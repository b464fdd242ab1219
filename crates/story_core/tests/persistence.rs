mod common;

use common::{decide, init_logging, profiles, reviewing, url};
use story_core::{update, AppState, Choice, Effect, LoadMode, Msg, SessionSnapshot};

#[test]
fn snapshot_restores_cursor_choices_and_skips() {
    init_logging();
    let state = reviewing(5);
    let (state, _) = decide(state, Choice::Yes);
    let (state, _) = update(state, Msg::SkipToggled(3));
    let (state, _) = update(state, Msg::ProfileSelected(2));
    let (state, _) = update(state, Msg::PreloadFinished { url: url(4) });

    let snapshot = state.session_snapshot();
    assert_eq!(snapshot.cursor, Some(2));
    assert_eq!(snapshot.history, vec![0, 1]);

    let (restored, effects) = update(AppState::new(), Msg::SessionRestored(Some(snapshot)));

    assert_eq!(
        effects,
        vec![Effect::FetchProfiles {
            mode: LoadMode::Reconcile
        }]
    );
    assert_eq!(restored.cursor(), state.cursor());
    assert_eq!(restored.choices(), state.choices());
    assert!(restored.is_skipped(&url(3)));
    assert!(restored.is_preloaded(&url(4)));
    assert_eq!(restored.history(), state.history());
    assert_eq!(restored.view().status.unwrap().text, "Session restored");
}

#[test]
fn reconcile_replaces_source_but_keeps_window() {
    init_logging();
    let snapshot = SessionSnapshot {
        profiles: profiles(2),
        cursor: Some(1),
        ..SessionSnapshot::default()
    };
    let (state, _) = update(AppState::new(), Msg::SessionRestored(Some(snapshot)));

    let (state, effects) = update(
        state,
        Msg::ProfilesLoaded {
            mode: LoadMode::Reconcile,
            profiles: profiles(30),
        },
    );

    assert!(effects.is_empty());
    let view = state.view();
    assert_eq!(view.rows.len(), 2);
    assert_eq!(view.source_len, 30);
    assert_eq!(view.position, 2);
    assert!(view.can_load_more);
}

#[test]
fn failed_reconcile_is_silent() {
    init_logging();
    let snapshot = SessionSnapshot {
        profiles: profiles(2),
        ..SessionSnapshot::default()
    };
    let (mut state, _) = update(AppState::new(), Msg::SessionRestored(Some(snapshot)));
    state.consume_dirty();

    let (mut state, _) = update(
        state,
        Msg::ProfilesFailed {
            mode: LoadMode::Reconcile,
            error: "offline".to_string(),
        },
    );
    assert!(!state.consume_dirty());
    assert_eq!(state.view().rows.len(), 2);
}

#[test]
fn out_of_range_cursor_in_snapshot_is_clamped() {
    init_logging();
    let snapshot = SessionSnapshot {
        profiles: profiles(2),
        cursor: Some(9),
        history: vec![0, 7],
        ..SessionSnapshot::default()
    };
    let (state, _) = update(AppState::new(), Msg::SessionRestored(Some(snapshot)));
    assert_eq!(state.cursor(), Some(1));
    assert_eq!(state.history(), &[0]);
}

#[test]
fn missing_snapshot_triggers_fresh_load_and_drops_stale_choices() {
    init_logging();
    let (state, effects) = update(AppState::new(), Msg::SessionRestored(None));
    assert_eq!(
        effects,
        vec![
            Effect::ForgetChoices,
            Effect::FetchProfiles {
                mode: LoadMode::Fresh
            },
        ]
    );
    assert!(state.view().loading);

    let (state, effects) = update(
        AppState::new(),
        Msg::SessionRestored(Some(SessionSnapshot::default())),
    );
    assert!(effects.contains(&Effect::ForgetChoices));
    assert!(state.choices().is_empty());
}

#[test]
fn fresh_load_failure_is_reported() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::SessionRestored(None));
    let (state, _) = update(
        state,
        Msg::ProfilesFailed {
            mode: LoadMode::Fresh,
            error: "People Sheet ID not set".to_string(),
        },
    );
    let view = state.view();
    assert!(!view.loading);
    assert_eq!(view.status.unwrap().text, "Error: People Sheet ID not set");
}

#[test]
fn clear_wipes_progress_and_persisted_session() {
    init_logging();
    let state = reviewing(3);
    let (state, _) = decide(state, Choice::Yes);
    let (state, _) = update(state, Msg::SkipToggled(2));

    let (state, effects) = update(state, Msg::ClearClicked);

    assert_eq!(
        effects,
        vec![
            Effect::ForgetSession,
            Effect::FetchProfiles {
                mode: LoadMode::Fresh
            },
        ]
    );
    assert!(state.choices().is_empty());
    assert!(!state.is_skipped(&url(2)));
    assert_eq!(state.cursor(), None);
    assert!(state.history().is_empty());
}

#[test]
fn reload_forgets_choices_but_keeps_cursor() {
    init_logging();
    let state = reviewing(3);
    let (state, _) = decide(state, Choice::No);

    let (state, effects) = update(state, Msg::ReloadClicked);
    assert_eq!(effects[0], Effect::ForgetChoices);
    assert!(state.choices().is_empty());

    let (state, _) = update(
        state,
        Msg::ProfilesLoaded {
            mode: LoadMode::Fresh,
            profiles: profiles(3),
        },
    );
    assert_eq!(state.cursor(), Some(1));
    assert!(!state.view().loading);
}
