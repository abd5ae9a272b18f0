#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use rusqlite::{params, Connection};

use browsersearch_core::locator::BrowserContext;

pub fn unique_dir(label: &str) -> PathBuf {
    let unique = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock should be after unix epoch")
        .as_nanos();
    let dir = std::env::temp_dir().join(format!(
        "browsersearch-{label}-{}-{unique}",
        std::process::id()
    ));
    std::fs::create_dir_all(&dir).expect("should create temp dir");
    dir
}

/// A fake per-user app-data layout with separate local and roaming roots.
pub struct Fixture {
    pub base: PathBuf,
    pub local: PathBuf,
    pub roaming: PathBuf,
    pub scratch: PathBuf,
}

impl Fixture {
    pub fn new(label: &str) -> Self {
        let base = unique_dir(label);
        let local = base.join("Local");
        let roaming = base.join("Roaming");
        let scratch = base.join("scratch");
        for dir in [&local, &roaming, &scratch] {
            std::fs::create_dir_all(dir).expect("should create fixture dir");
        }
        Self {
            base,
            local,
            roaming,
            scratch,
        }
    }

    pub fn context(&self, browser: &str) -> BrowserContext {
        BrowserContext::new(browser, &self.local, &self.roaming).with_icon_path("icons/browser.png")
    }

    pub fn chrome_root(&self) -> PathBuf {
        let root = self.local.join("Google").join("Chrome").join("User Data");
        std::fs::create_dir_all(&root).expect("should create chrome root");
        root
    }

    pub fn firefox_root(&self) -> PathBuf {
        let root = self.roaming.join("Mozilla").join("Firefox");
        std::fs::create_dir_all(&root).expect("should create firefox root");
        root
    }
}

impl Drop for Fixture {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.base);
    }
}

pub fn write_local_state(root: &Path, local_state: &serde_json::Value) {
    std::fs::write(
        root.join("Local State"),
        serde_json::to_vec(local_state).expect("local state should encode"),
    )
    .expect("should write Local State");
}

pub fn write_chromium_history(profile_dir: &Path, rows: &[(&str, &str, i64)]) {
    std::fs::create_dir_all(profile_dir).expect("should create profile dir");
    let db = Connection::open(profile_dir.join("History")).expect("should create History");
    db.execute(
        "CREATE TABLE urls (id INTEGER PRIMARY KEY, url LONGVARCHAR, title LONGVARCHAR, visit_count INTEGER DEFAULT 0 NOT NULL)",
        [],
    )
    .expect("should create urls");
    for (url, title, visits) in rows {
        db.execute(
            "INSERT INTO urls (url, title, visit_count) VALUES (?1, ?2, ?3)",
            params![url, title, visits],
        )
        .expect("should insert url");
    }
}

pub fn write_chromium_predictor(profile_dir: &Path, rows: &[(&str, &str, i64)]) {
    std::fs::create_dir_all(profile_dir).expect("should create profile dir");
    let db = Connection::open(profile_dir.join("Network Action Predictor"))
        .expect("should create predictor db");
    db.execute(
        "CREATE TABLE network_action_predictor (id TEXT PRIMARY KEY, user_text TEXT, url TEXT, number_of_hits INTEGER, number_of_misses INTEGER)",
        [],
    )
    .expect("should create network_action_predictor");
    for (index, (user_text, url, hits)) in rows.iter().enumerate() {
        db.execute(
            "INSERT INTO network_action_predictor (id, user_text, url, number_of_hits, number_of_misses) VALUES (?1, ?2, ?3, ?4, 0)",
            params![index.to_string(), user_text, url, hits],
        )
        .expect("should insert prediction");
    }
}

/// A Chromium profile with both databases.
pub fn write_chromium_profile(
    profile_dir: &Path,
    history: &[(&str, &str, i64)],
    predictions: &[(&str, &str, i64)],
) {
    write_chromium_history(profile_dir, history);
    write_chromium_predictor(profile_dir, predictions);
}

pub fn write_firefox_places(profile_dir: &Path, rows: &[(Option<&str>, Option<&str>, Option<i64>)]) {
    std::fs::create_dir_all(profile_dir).expect("should create profile dir");
    let db = Connection::open(profile_dir.join("places.sqlite")).expect("should create places");
    db.execute(
        "CREATE TABLE moz_places (id INTEGER PRIMARY KEY, url LONGVARCHAR, title LONGVARCHAR, frecency INTEGER)",
        [],
    )
    .expect("should create moz_places");
    for (url, title, frecency) in rows {
        db.execute(
            "INSERT INTO moz_places (url, title, frecency) VALUES (?1, ?2, ?3)",
            params![url, title, frecency],
        )
        .expect("should insert place");
    }
}

pub fn two_profile_local_state() -> serde_json::Value {
    serde_json::json!({
        "profile": {
            "info_cache": {
                "Default": {
                    "name": "Person 1",
                    "gaia_given_name": "Ada",
                    "gaia_name": "Ada Lovelace",
                    "shortcut_name": ""
                },
                "Profile 1": {
                    "name": "Personal",
                    "shortcut_name": "Home"
                }
            }
        }
    })
}
