use std::path::Path;

use rusqlite::Connection;

use super::{PredictionSignal, ProfileHistory, SchemaAdapter};
use crate::error::IngestError;
use crate::locator::ChromiumLayout;
use crate::model::{BrowserFamily, HistoryEntry};
use crate::profiles::{self, ProfileHandle, ProfileIndex};
use crate::snapshot::SnapshotReader;

pub const HISTORY_FILE: &str = "History";
pub const PREDICTOR_FILE: &str = "Network Action Predictor";

const PREDICTIONS_QUERY: &str = "SELECT user_text, url, number_of_hits FROM network_action_predictor";
const HISTORY_QUERY: &str = "SELECT url, title, visit_count FROM urls ORDER BY visit_count DESC";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChromiumAdapter {
    layout: ChromiumLayout,
}

impl ChromiumAdapter {
    pub fn new(layout: ChromiumLayout) -> Self {
        Self { layout }
    }
}

impl SchemaAdapter for ChromiumAdapter {
    fn family(&self) -> BrowserFamily {
        BrowserFamily::Chromium
    }

    fn resolve_profiles(&self, storage_root: &Path) -> Result<ProfileIndex, IngestError> {
        match self.layout {
            ChromiumLayout::LocalState => profiles::resolve_chromium_profiles(storage_root),
            ChromiumLayout::SingleProfile => Ok(profiles::resolve_single_profile(storage_root)),
        }
    }

    fn ingest_profile(
        &self,
        profile: &ProfileHandle,
        snapshots: &SnapshotReader,
    ) -> Result<ProfileHistory, IngestError> {
        log::info!("initializing chromium profile '{}'", profile.path.display());

        let history_db = snapshots.open(profile, HISTORY_FILE, "History")?;
        let predictor_db = snapshots.open(profile, PREDICTOR_FILE, "ActionPredictor")?;
        let history_path = snapshots.snapshot_path(profile, "History");
        let predictor_path = snapshots.snapshot_path(profile, "ActionPredictor");

        let mut out = ProfileHistory::empty(BrowserFamily::Chromium);
        read_predictions(&predictor_db, &mut out.signal).map_err(|source| {
            IngestError::SnapshotQueryFailure {
                path: predictor_path,
                source,
            }
        })?;
        read_history(&history_db, &mut out.entries).map_err(|source| {
            IngestError::SnapshotQueryFailure {
                path: history_path,
                source,
            }
        })?;

        log::info!(
            "chromium profile '{}' loaded entries={}",
            profile.path.display(),
            out.entries.len()
        );
        Ok(out)
    }
}

pub fn read_predictions(
    db: &Connection,
    signal: &mut PredictionSignal,
) -> Result<(), rusqlite::Error> {
    let mut stmt = db.prepare(PREDICTIONS_QUERY)?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let user_text: Option<String> = row.get(0)?;
        let url: Option<String> = row.get(1)?;
        let hits: Option<i64> = row.get(2)?;
        let (Some(user_text), Some(url)) = (user_text, url) else {
            continue;
        };
        signal.add_prediction(user_text, url, hits.unwrap_or(0));
    }
    Ok(())
}

/// Rows arrive most-visited first and keep that order.
pub fn read_history(db: &Connection, entries: &mut Vec<HistoryEntry>) -> Result<(), rusqlite::Error> {
    let mut stmt = db.prepare(HISTORY_QUERY)?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let url: Option<String> = row.get(0)?;
        let Some(url) = url.filter(|u| !u.is_empty()) else {
            continue;
        };
        let title: Option<String> = row.get(1)?;
        let visit_count: Option<i64> = row.get(2)?;
        entries.push(HistoryEntry::from_owned(
            url,
            title.unwrap_or_default(),
            visit_count.unwrap_or(0),
        ));
    }
    Ok(())
}
