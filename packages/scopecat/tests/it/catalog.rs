//! Catalog persistence against real files.

use std::fs;
use std::path::Path;

use pretty_assertions::assert_eq as pretty_assert_eq;
use scopecat::catalog::{CatalogConfig, Query, ScopedCatalog};
use scopecat::console::Recorder;
use serde_json::{Value, json};

fn open<'a>(path: &Path, console: &'a Recorder) -> ScopedCatalog<&'a Recorder> {
    let config = CatalogConfig::builder()
        .path(path)
        .working_dir("/work/project")
        .build();
    ScopedCatalog::open(config, console)
}

fn rows(catalog: &ScopedCatalog<&Recorder>) -> Vec<(String, String, Option<String>, Value, bool)> {
    catalog
        .query(&Query::all())
        .map(|row| {
            (
                row.name.to_string(),
                row.scope.to_string(),
                row.comment.map(str::to_string),
                row.payload.clone(),
                row.active,
            )
        })
        .collect()
}

#[test]
fn test_round_trip_preserves_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.json");
    let console = Recorder::default();

    let mut catalog = open(&path, &console);
    catalog.set("ls", json!(["ls", "-l"]), false);
    catalog.set("ls@/work", json!(["ls", "-la"]), false);
    catalog.set("ls@/other", json!(["ls"]), false);
    catalog.set("count", 3, false);
    catalog.comment("ls", "list files", false);
    assert!(catalog.save());
    let before = rows(&catalog);

    let reopened = open(&path, &console);
    pretty_assert_eq!(rows(&reopened), before);
    assert!(!reopened.is_modified());
    pretty_assert_eq!(console.errors(), Vec::<String>::new());
}

#[test]
fn test_saved_file_layout() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested/catalog.json");
    let console = Recorder::default();

    let mut catalog = open(&path, &console);
    catalog.set("zzz", "last", false);
    catalog.set("aaa", "first", false);
    catalog.set("aaa@/b", "b", false);
    catalog.set("aaa@/a", "a", false);
    assert!(catalog.save());

    let saved = fs::read_to_string(&path).unwrap();
    let names = saved
        .lines()
        .filter(|line| line.starts_with("  \""))
        .collect::<Vec<_>>();
    pretty_assert_eq!(names, vec![r#"  "aaa": {"#, r#"  "zzz": {"#]);

    let saved = serde_json::from_str::<Value>(&saved).unwrap();
    let scopes = saved["aaa"]["payloads"]
        .as_object()
        .unwrap()
        .keys()
        .cloned()
        .collect::<Vec<_>>();
    pretty_assert_eq!(scopes, vec!["", "/a", "/b"]);
}

#[test]
fn test_malformed_file_disables_saving_until_clean_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.json");
    fs::write(
        &path,
        r#"{"good": {"payloads": {"": "x"}}, "bad": {"payloads": {"/s": "y"}}}"#,
    )
    .unwrap();
    let console = Recorder::default();

    let mut catalog = open(&path, &console);
    assert!(catalog.exists("good"));
    assert!(!catalog.exists("bad"));
    assert!(catalog.is_saving_disabled());
    pretty_assert_eq!(
        console.errors(),
        vec![
            format!("Failed to load: {}", path.display()),
            "Bad payload data: bad".to_string(),
        ]
    );

    catalog.set("new", "value", false);
    assert!(!catalog.save());
    assert!(fs::read_to_string(&path).unwrap().contains("\"bad\""));
    pretty_assert_eq!(
        console.errors()[2..].to_vec(),
        vec![
            "Saving was disabled due to errors.".to_string(),
            "Please correct previous errors or delete the file.".to_string(),
            path.display().to_string(),
        ]
    );

    fs::write(&path, r#"{"good": {"payloads": {"": "x"}}}"#).unwrap();
    catalog.load();
    assert!(!catalog.is_saving_disabled());
    catalog.set("new", "value", false);
    assert!(catalog.save());
    let saved = serde_json::from_str::<Value>(&fs::read_to_string(&path).unwrap()).unwrap();
    pretty_assert_eq!(
        saved,
        json!({"good": {"payloads": {"": "x"}}, "new": {"payloads": {"": "value"}}})
    );
}

#[test]
fn test_invalid_json_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.json");
    fs::write(&path, "[1, 2").unwrap();
    let console = Recorder::default();

    let catalog = open(&path, &console);
    pretty_assert_eq!(catalog.item_count(), 0);
    assert!(catalog.is_saving_disabled());
    pretty_assert_eq!(console.errors().len(), 2);
    assert!(console.errors()[1].starts_with("Catalog is not valid JSON"));
}

#[test]
fn test_session_saves_only_successful_changes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.json");
    let console = Recorder::default();
    let mut catalog = open(&path, &console);

    let failed: Result<(), &str> = catalog.session(|catalog| {
        catalog.set("aaa", "abc", false);
        Err("changed my mind")
    });
    assert!(failed.is_err());
    assert!(!path.exists());
    assert!(catalog.is_modified());

    let count = catalog.session(|catalog| {
        catalog.set("bbb", "def", false);
        Ok::<_, ()>(catalog.item_count())
    });
    pretty_assert_eq!(count, Ok(2));
    assert!(path.exists());
    assert!(!catalog.is_modified());
}

#[test]
fn test_session_without_changes_does_not_write() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.json");
    let console = Recorder::default();
    let mut catalog = open(&path, &console);

    let found = catalog.session(|catalog| Ok::<_, ()>(catalog.get("missing").item_exists));
    pretty_assert_eq!(found, Ok(false));
    assert!(!path.exists());
}

#[test]
fn test_save_failure_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let folder = dir.path().join("catalogs");
    let path = folder.join("catalog.json");
    let console = Recorder::default();

    let mut catalog = open(&path, &console);
    fs::write(&folder, "not a folder").unwrap();
    catalog.set("aaa", "abc", false);
    assert!(!catalog.save());
    assert!(catalog.is_modified());
    pretty_assert_eq!(
        console.errors()[0],
        format!("Failed to save: {}", path.display())
    );
    pretty_assert_eq!(catalog.get("aaa").found_payload, Some(json!("abc")));
}
