use std::collections::BTreeMap;

use crate::{Choice, LoadMode, Profile};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchProfiles { mode: LoadMode },
    OpenProfile { url: String },
    Preload { urls: Vec<String> },
    LogChoice {
        profile: Profile,
        choice: Choice,
        special: bool,
    },
    PersistChoices(BTreeMap<String, Choice>),
    /// Delete the persisted choice map.
    ForgetChoices,
    /// Delete the persisted session snapshot and choice map.
    ForgetSession,
    SaveSpecialProfiles(Vec<String>),
    SearchName { name: String },
    SearchNext,
    SearchPrev,
    ClearSearch,
    ExportLinks(Vec<String>),
}
