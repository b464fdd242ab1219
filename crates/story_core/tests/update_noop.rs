use story_core::{update, AppState, Msg};

#[test]
fn prev_on_empty_state_is_a_noop() {
    let state = AppState::new();
    let (mut next, effects) = update(state.clone(), Msg::PrevClicked);

    assert_eq!(state, next);
    assert!(effects.is_empty());
    assert!(!next.consume_dirty());
}

#[test]
fn navigation_on_empty_state_selects_nothing() {
    for msg in [Msg::NextClicked, Msg::BackClicked, Msg::LoadMoreClicked] {
        let (next, effects) = update(AppState::new(), msg);
        assert!(effects.is_empty());
        assert_eq!(next.cursor(), None);
        assert!(next.view().rows.is_empty());
    }
}
