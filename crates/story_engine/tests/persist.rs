use std::fs;

use story_engine::{ensure_state_dir, StateStore};
use tempfile::TempDir;

#[test]
fn creates_missing_state_dir() {
    let temp = TempDir::new().unwrap();
    let new_dir = temp.path().join("state");
    assert!(!new_dir.exists());
    ensure_state_dir(&new_dir).unwrap();
    assert!(new_dir.is_dir());
}

#[test]
fn write_replaces_existing_file() {
    let temp = TempDir::new().unwrap();
    let store = StateStore::new(temp.path().join("nested"));

    let first = store.write_atomic("session.ron", "(cursor: Some(1))").unwrap();
    assert_eq!(first.file_name().unwrap(), "session.ron");
    let second = store.write_atomic("session.ron", "(cursor: None)").unwrap();
    assert_eq!(first, second);
    assert_eq!(fs::read_to_string(&second).unwrap(), "(cursor: None)");

    let leftovers = fs::read_dir(store.dir()).unwrap().count();
    assert_eq!(leftovers, 1, "temp files are renamed away");
}

#[test]
fn missing_files_read_as_none_and_remove_reports_it() {
    let temp = TempDir::new().unwrap();
    let store = StateStore::new(temp.path().to_path_buf());

    assert_eq!(store.read("choices.ron").unwrap(), None);
    assert!(!store.remove("choices.ron").unwrap());

    store.write_atomic("choices.ron", "{}").unwrap();
    assert_eq!(store.read("choices.ron").unwrap().as_deref(), Some("{}"));
    assert!(store.remove("choices.ron").unwrap());
    assert!(!store.path("choices.ron").exists());
}

#[test]
fn file_in_place_of_state_dir_is_an_error() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    let store = StateStore::new(file_path.clone());
    assert!(store.write_atomic("session.ron", "data").is_err());
    assert!(ensure_state_dir(&file_path).is_err());
}
