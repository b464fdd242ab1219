use crate::{Choice, Filter, LoadMode, Profile, SearchOutcome, SessionSnapshot};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Startup: the persisted session, if one was found.
    SessionRestored(Option<SessionSnapshot>),
    /// Operator-curated special names read from settings.
    SpecialProfilesLoaded(Vec<String>),
    /// Engine finished fetching the profile source.
    ProfilesLoaded {
        mode: LoadMode,
        profiles: Vec<Profile>,
    },
    /// Engine failed to fetch the profile source.
    ProfilesFailed { mode: LoadMode, error: String },
    /// User jumped to a row of the loaded window.
    ProfileSelected(usize),
    NextClicked,
    PrevClicked,
    BackClicked,
    /// User decided YES/NO for the current profile.
    ChoiceMade(Choice),
    /// Engine finished (or failed) appending log rows for a choice.
    ChoiceLogged {
        url: String,
        choice: Choice,
        result: Result<(), String>,
    },
    LoadMoreClicked,
    SkipToggled(usize),
    SpecialToggled(usize),
    UndoClicked(usize),
    RemoveClicked(usize),
    FilterToggled(Filter),
    /// Re-fetch the source and drop recorded choices.
    ReloadClicked,
    /// Wipe all progress and start over.
    ClearClicked,
    /// Re-open the current profile page.
    ReloadPageClicked,
    CopyYesLinksClicked,
    /// Engine reported whether the page for `url` was opened.
    ProfileOpened { url: String, result: Result<(), String> },
    /// A warm-up request for `url` settled (success or failure).
    PreloadFinished { url: String },
    SearchModeToggled,
    /// User typed a name to look up in the log sheet.
    SearchRequested(String),
    SearchNextClicked,
    SearchPrevClicked,
    /// Engine result for a search or match navigation.
    SearchFinished(SearchOutcome),
}
