mod common;

use browsersearch_core::error::IngestError;
use browsersearch_core::profiles::ProfileHandle;
use browsersearch_core::snapshot::{SnapshotReader, SNAPSHOT_PREFIX};
use common::{write_chromium_history, Fixture};

fn count_urls(db: &rusqlite::Connection) -> i64 {
    db.query_row("SELECT COUNT(*) FROM urls", [], |row| row.get(0))
        .unwrap()
}

#[test]
fn opens_a_copy_in_the_scratch_directory() {
    let fixture = Fixture::new("snapshot-copy");
    let profile_dir = fixture.chrome_root().join("Default");
    write_chromium_history(&profile_dir, &[("https://github.com", "GitHub", 3)]);
    let profile = ProfileHandle::new(None, profile_dir.clone());
    let reader = SnapshotReader::new(&fixture.scratch);

    let db = reader.open(&profile, "History", "History").unwrap();

    assert_eq!(count_urls(&db), 1);
    let copy = reader.snapshot_path(&profile, "History");
    assert!(copy.starts_with(&fixture.scratch));
    assert!(copy.is_file());
    assert!(copy
        .file_name()
        .unwrap()
        .to_string_lossy()
        .starts_with(SNAPSHOT_PREFIX));
}

#[test]
fn snapshot_connection_is_read_only() {
    let fixture = Fixture::new("snapshot-read-only");
    let profile_dir = fixture.chrome_root().join("Default");
    write_chromium_history(&profile_dir, &[("https://github.com", "GitHub", 3)]);
    let profile = ProfileHandle::new(None, profile_dir);
    let reader = SnapshotReader::new(&fixture.scratch);

    let db = reader.open(&profile, "History", "History").unwrap();

    assert!(db.execute("DELETE FROM urls", []).is_err());
}

#[test]
fn missing_source_database_is_reported() {
    let fixture = Fixture::new("snapshot-missing");
    let profile_dir = fixture.chrome_root().join("Default");
    std::fs::create_dir_all(&profile_dir).unwrap();
    let profile = ProfileHandle::new(None, profile_dir.clone());
    let reader = SnapshotReader::new(&fixture.scratch);

    match reader.open(&profile, "History", "History") {
        Err(IngestError::DatabaseMissing(path)) => assert_eq!(path, profile_dir.join("History")),
        Err(other) => panic!("unexpected error: {other:?}"),
        Ok(_) => panic!("snapshot of a missing database should fail"),
    }
}

#[test]
fn paths_are_stable_per_profile_and_kind() {
    let fixture = Fixture::new("snapshot-paths");
    let root = fixture.chrome_root();
    let reader = SnapshotReader::new(&fixture.scratch);
    let default = ProfileHandle::new(None, root.join("Default"));
    let personal = ProfileHandle::new(None, root.join("Profile 1"));

    assert_eq!(
        reader.snapshot_path(&default, "History"),
        reader.snapshot_path(&default, "History")
    );
    assert_ne!(
        reader.snapshot_path(&default, "History"),
        reader.snapshot_path(&personal, "History")
    );
    assert_ne!(
        reader.snapshot_path(&default, "History"),
        reader.snapshot_path(&default, "ActionPredictor")
    );
}

#[test]
fn same_directory_name_in_different_roots_does_not_collide() {
    let fixture = Fixture::new("snapshot-collide");
    let reader = SnapshotReader::new(&fixture.scratch);
    let chrome = ProfileHandle::new(None, fixture.local.join("Chrome").join("Default"));
    let edge = ProfileHandle::new(None, fixture.local.join("Edge").join("Default"));

    assert_ne!(
        reader.snapshot_path(&chrome, "History"),
        reader.snapshot_path(&edge, "History")
    );
}

#[test]
fn resnapshot_replaces_the_previous_copy() {
    let fixture = Fixture::new("snapshot-refresh");
    let profile_dir = fixture.chrome_root().join("Default");
    write_chromium_history(&profile_dir, &[("https://github.com", "GitHub", 3)]);
    let profile = ProfileHandle::new(None, profile_dir.clone());
    let reader = SnapshotReader::new(&fixture.scratch);

    let first = reader.open(&profile, "History", "History").unwrap();
    assert_eq!(count_urls(&first), 1);
    drop(first);

    let source = rusqlite::Connection::open(profile_dir.join("History")).unwrap();
    source
        .execute(
            "INSERT INTO urls (url, title, visit_count) VALUES ('https://docs.rs', 'Docs.rs', 1)",
            [],
        )
        .unwrap();
    drop(source);

    let second = reader.open(&profile, "History", "History").unwrap();
    assert_eq!(count_urls(&second), 2);
}
