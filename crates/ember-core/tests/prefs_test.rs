//! Preference store tests.

use ember_core::prefs::PrefsStore;
use tempfile::TempDir;

#[test]
fn defaults_apply_on_a_fresh_directory() {
    let dir = TempDir::new().unwrap();
    let store = PrefsStore::open(Some(dir.path().to_path_buf()));
    assert_eq!(store.data.port, 8000);
    assert_eq!(store.data.last_project, "");
}

#[test]
fn saved_preferences_load_back() {
    let dir = TempDir::new().unwrap();
    let mut store = PrefsStore::open(Some(dir.path().to_path_buf()));
    store.data.last_project = "/test/path".to_string();
    store.data.port = 9000;
    store.save().unwrap();

    let reloaded = PrefsStore::open(Some(dir.path().to_path_buf()));
    assert_eq!(reloaded.data.last_project, "/test/path");
    assert_eq!(reloaded.data.port, 9000);
}

#[test]
fn typed_setters_persist_immediately() {
    let dir = TempDir::new().unwrap();
    let mut store = PrefsStore::open(Some(dir.path().to_path_buf()));
    store.set_port(9100).unwrap();
    store.set_last_project("/srv/site").unwrap();

    let reloaded = PrefsStore::open(Some(dir.path().to_path_buf()));
    assert_eq!(reloaded.data.port, 9100);
    assert_eq!(reloaded.data.last_project, "/srv/site");
}

#[test]
fn corrupt_file_falls_back_to_defaults() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("config.json"), "{not json").unwrap();
    let store = PrefsStore::open(Some(dir.path().to_path_buf()));
    assert_eq!(store.data.port, 8000);
    assert_eq!(store.data.last_project, "");
}

#[test]
fn unknown_and_missing_keys_are_tolerated() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("config.json"),
        r#"{"port": 9100, "window_geometry": "700x600"}"#,
    )
    .unwrap();
    let store = PrefsStore::open(Some(dir.path().to_path_buf()));
    assert_eq!(store.data.port, 9100);
    assert_eq!(store.data.last_project, "");
}
