use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use story_core::{Choice, Platform, Profile, SessionSnapshot};
use story_engine::StateStore;
use story_logging::{story_error, story_info, story_warn};

const SESSION_FILENAME: &str = "session.ron";
const CHOICES_FILENAME: &str = "choices.ron";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PersistedProfile {
    name: String,
    platform: String,
    url: String,
    #[serde(default)]
    instagram_url: String,
    #[serde(default)]
    facebook_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
struct PersistedSession {
    profiles: Vec<PersistedProfile>,
    cursor: Option<usize>,
    page: usize,
    preloaded: Vec<String>,
    skipped: Vec<String>,
    history: Vec<usize>,
}

/// Verdicts keyed by profile URL, stored as `"YES"` / `"NO"`.
type PersistedChoices = BTreeMap<String, String>;

/// Session snapshot plus the separately stored choice map, or `None` when no
/// usable session was saved.
pub(crate) fn load_snapshot(store: &StateStore) -> Option<SessionSnapshot> {
    let session: PersistedSession = read_ron(store, SESSION_FILENAME)?;
    let profiles = session
        .profiles
        .into_iter()
        .filter_map(|p| match p.platform.parse::<Platform>() {
            Ok(platform) => Some(Profile {
                name: p.name,
                platform,
                url: p.url,
                instagram_url: p.instagram_url,
                facebook_url: p.facebook_url,
            }),
            Err(err) => {
                story_warn!("Dropping persisted profile {:?}: {}", p.name, err);
                None
            }
        })
        .collect();

    let snapshot = SessionSnapshot {
        profiles,
        cursor: session.cursor,
        page: session.page,
        preloaded: session.preloaded,
        skipped: session.skipped,
        history: session.history,
        choices: load_choices(store),
    };
    story_info!(
        "Loaded session with {} profiles and {} choices",
        snapshot.profiles.len(),
        snapshot.choices.len()
    );
    Some(snapshot)
}

pub(crate) fn load_choices(store: &StateStore) -> BTreeMap<String, Choice> {
    let persisted: PersistedChoices = read_ron(store, CHOICES_FILENAME).unwrap_or_default();
    persisted
        .into_iter()
        .filter_map(|(url, choice)| match choice.parse::<Choice>() {
            Ok(choice) => Some((url, choice)),
            Err(err) => {
                story_warn!("Ignoring persisted choice for {}: {}", url, err);
                None
            }
        })
        .collect()
}

pub(crate) fn save_snapshot(store: &StateStore, snapshot: &SessionSnapshot) {
    let session = PersistedSession {
        profiles: snapshot
            .profiles
            .iter()
            .map(|p| PersistedProfile {
                name: p.name.clone(),
                platform: p.platform.label().to_string(),
                url: p.url.clone(),
                instagram_url: p.instagram_url.clone(),
                facebook_url: p.facebook_url.clone(),
            })
            .collect(),
        cursor: snapshot.cursor,
        page: snapshot.page,
        preloaded: snapshot.preloaded.clone(),
        skipped: snapshot.skipped.clone(),
        history: snapshot.history.clone(),
    };
    write_ron(store, SESSION_FILENAME, &session);
    save_choices(store, &snapshot.choices);
}

pub(crate) fn save_choices(store: &StateStore, choices: &BTreeMap<String, Choice>) {
    let persisted: PersistedChoices = choices
        .iter()
        .map(|(url, choice)| (url.clone(), choice.as_str().to_string()))
        .collect();
    write_ron(store, CHOICES_FILENAME, &persisted);
}

pub(crate) fn forget_choices(store: &StateStore) {
    remove(store, CHOICES_FILENAME);
}

pub(crate) fn forget_session(store: &StateStore) {
    remove(store, SESSION_FILENAME);
    remove(store, CHOICES_FILENAME);
}

fn read_ron<T: for<'de> Deserialize<'de>>(store: &StateStore, filename: &str) -> Option<T> {
    let content = match store.read(filename) {
        Ok(Some(text)) => text,
        Ok(None) => return None,
        Err(err) => {
            story_warn!("Failed to read {}: {}", filename, err);
            return None;
        }
    };
    match ron::from_str(&content) {
        Ok(value) => Some(value),
        Err(err) => {
            story_warn!("Failed to parse {}: {}", filename, err);
            None
        }
    }
}

fn write_ron<T: Serialize>(store: &StateStore, filename: &str, value: &T) {
    let content = match ron::ser::to_string_pretty(value, ron::ser::PrettyConfig::new()) {
        Ok(text) => text,
        Err(err) => {
            story_error!("Failed to serialize {}: {}", filename, err);
            return;
        }
    };
    if let Err(err) = store.write_atomic(filename, &content) {
        story_error!("Failed to write {} to {:?}: {}", filename, store.dir(), err);
    }
}

fn remove(store: &StateStore, filename: &str) {
    if let Err(err) = store.remove(filename) {
        story_warn!("Failed to remove {}: {}", filename, err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store() -> (TempDir, StateStore) {
        let temp = TempDir::new().unwrap();
        let store = StateStore::new(temp.path().to_path_buf());
        (temp, store)
    }

    #[test]
    fn snapshot_round_trips_with_choices() {
        let (_temp, store) = store();
        let mut choices = BTreeMap::new();
        choices.insert("ig.co/a".to_string(), Choice::Yes);
        choices.insert("fb.co/b".to_string(), Choice::No);
        let snapshot = SessionSnapshot {
            profiles: vec![
                Profile::instagram("Alice", "ig.co/a").with_facebook("fb.co/a"),
                Profile::facebook("Bob", "fb.co/b"),
            ],
            cursor: Some(1),
            page: 2,
            preloaded: vec!["ig.co/a".to_string()],
            skipped: vec!["fb.co/b".to_string()],
            history: vec![0],
            choices,
        };

        save_snapshot(&store, &snapshot);
        assert_eq!(load_snapshot(&store), Some(snapshot));
    }

    #[test]
    fn no_session_file_means_no_snapshot() {
        let (_temp, store) = store();
        save_choices(&store, &BTreeMap::from([("x".to_string(), Choice::Yes)]));
        assert_eq!(load_snapshot(&store), None);
        assert_eq!(load_choices(&store).len(), 1);
    }

    #[test]
    fn corrupt_session_is_treated_as_absent() {
        let (_temp, store) = store();
        store.write_atomic(SESSION_FILENAME, "{{{ nope").unwrap();
        assert_eq!(load_snapshot(&store), None);
    }

    #[test]
    fn forgetting_removes_files() {
        let (_temp, store) = store();
        save_snapshot(&store, &SessionSnapshot::default());
        forget_choices(&store);
        assert!(!store.path(CHOICES_FILENAME).exists());
        assert!(store.path(SESSION_FILENAME).exists());

        forget_session(&store);
        assert!(!store.path(SESSION_FILENAME).exists());
    }
}
