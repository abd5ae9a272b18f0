use std::path::Path;

use rusqlite::Connection;

use super::{ProfileHistory, SchemaAdapter};
use crate::error::IngestError;
use crate::model::{BrowserFamily, HistoryEntry};
use crate::profiles::{self, ProfileHandle, ProfileIndex};
use crate::snapshot::SnapshotReader;

pub const PLACES_FILE: &str = "places.sqlite";

const PLACES_QUERY: &str =
    "SELECT url, title, frecency FROM moz_places GROUP BY url ORDER BY frecency DESC";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FirefoxAdapter;

impl SchemaAdapter for FirefoxAdapter {
    fn family(&self) -> BrowserFamily {
        BrowserFamily::Firefox
    }

    fn resolve_profiles(&self, storage_root: &Path) -> Result<ProfileIndex, IngestError> {
        profiles::resolve_firefox_profiles(storage_root)
    }

    fn ingest_profile(
        &self,
        profile: &ProfileHandle,
        snapshots: &SnapshotReader,
    ) -> Result<ProfileHistory, IngestError> {
        log::info!("initializing firefox profile '{}'", profile.path.display());

        let places_db = snapshots.open(profile, PLACES_FILE, "Places")?;
        let mut out = ProfileHistory::empty(BrowserFamily::Firefox);
        read_places(&places_db, &mut out).map_err(|source| IngestError::SnapshotQueryFailure {
            path: snapshots.snapshot_path(profile, "Places"),
            source,
        })?;

        log::info!(
            "firefox profile '{}' loaded entries={}",
            profile.path.display(),
            out.entries.len()
        );
        Ok(out)
    }
}

/// Keeps descending-frecency order; ranking breaks ties on the metric, so
/// the rows are not reversed.
pub fn read_places(db: &Connection, out: &mut ProfileHistory) -> Result<(), rusqlite::Error> {
    let mut stmt = db.prepare(PLACES_QUERY)?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let url: Option<String> = row.get(0)?;
        let title: Option<String> = row.get(1)?;
        let frecency: Option<i64> = row.get(2)?;
        let (Some(url), Some(title), Some(frecency)) = (url, title, frecency) else {
            continue;
        };
        if url.is_empty() {
            continue;
        }

        out.signal.set_frecency(&url, &title, frecency);
        out.entries.push(HistoryEntry::from_owned(url, title, frecency));
    }
    Ok(())
}
