use std::path::PathBuf;

use crate::adapter::adapter_for;
use crate::error::IngestError;
use crate::locator::{self, BrowserContext};
use crate::snapshot::SnapshotReader;
use crate::store::HistoryStore;

#[derive(Debug, Clone, Default)]
pub struct IngestOptions {
    /// Load only this profile (matched case-insensitively against every
    /// alias); `None` loads all of them.
    pub profile: Option<String>,
    pub snapshots: SnapshotReader,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedProfile {
    pub path: PathBuf,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IngestReport {
    pub browser: String,
    pub storage_root: PathBuf,
    pub profiles_loaded: usize,
    pub skipped: Vec<SkippedProfile>,
    pub entries: usize,
    /// Conditions the user should hear about even though ingestion went on.
    pub notices: Vec<String>,
}

/// Builds a complete store for the browser described by `context`.
/// Session-wide failures return `Err`; a profile that cannot be read is
/// recorded in the report and contributes nothing.
pub fn ingest(
    context: &BrowserContext,
    options: &IngestOptions,
) -> Result<(HistoryStore, IngestReport), IngestError> {
    let located = locator::locate(context)?;
    log::info!("initializing browser '{}'", located.name);

    let adapter = adapter_for(&located);
    let index = adapter.resolve_profiles(&located.storage_root)?;

    let mut report = IngestReport {
        browser: located.name.to_string(),
        storage_root: located.storage_root.clone(),
        ..IngestReport::default()
    };

    let requested = match options.profile.as_deref() {
        Some(name) if located.kind.is_single_profile() => {
            log::warn!("ignoring profile '{name}': {} has a single profile", located.name);
            report
                .notices
                .push(format!("Browser profiles aren't supported on {}", located.name));
            None
        }
        requested => requested,
    };
    let selected = index.select(requested).inspect_err(|e| log::error!("{e}"))?;

    let mut store = HistoryStore::empty(adapter.family()).with_icon_path(&context.icon_path);
    for profile in selected {
        match adapter.ingest_profile(&profile, &options.snapshots) {
            Ok(history) => store.merge_profile(history),
            Err(error) if error.is_profile_scoped() => {
                log::warn!("skipping profile '{}': {error}", profile.path.display());
                report.skipped.push(SkippedProfile {
                    path: profile.path.clone(),
                    reason: error.to_string(),
                });
            }
            Err(error) => return Err(error),
        }
    }

    report.profiles_loaded = store.profiles_loaded();
    report.entries = store.len();
    log::info!(
        "browser '{}' ready profiles_loaded={} skipped={} entries={}",
        report.browser,
        report.profiles_loaded,
        report.skipped.len(),
        report.entries
    );
    Ok((store, report))
}
