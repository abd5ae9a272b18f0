use std::collections::hash_map::DefaultHasher;
use std::fs;
use std::hash::{Hash, Hasher};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use rusqlite::{Connection, OpenFlags};

use crate::error::IngestError;
use crate::profiles::ProfileHandle;

pub const SNAPSHOT_PREFIX: &str = "BrowserSearch";
const WAL_SUFFIX: &str = "-wal";
const SHM_SUFFIX: &str = "-shm";

/// Copies databases the browser keeps locked into a scratch directory and
/// opens the copies read-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotReader {
    scratch_dir: PathBuf,
}

impl Default for SnapshotReader {
    fn default() -> Self {
        Self::new(std::env::temp_dir())
    }
}

impl SnapshotReader {
    pub fn new(scratch_dir: impl Into<PathBuf>) -> Self {
        Self {
            scratch_dir: scratch_dir.into(),
        }
    }

    pub fn scratch_dir(&self) -> &Path {
        &self.scratch_dir
    }

    /// Deterministic per profile and database kind, so a reload overwrites
    /// the previous copy.
    pub fn snapshot_path(&self, profile: &ProfileHandle, kind: &str) -> PathBuf {
        let mut hasher = DefaultHasher::new();
        profile.path.hash(&mut hasher);
        let dir_name: String = profile
            .dir_name()
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '.' { c } else { '_' })
            .collect();
        self.scratch_dir.join(format!(
            "{SNAPSHOT_PREFIX}_{kind}_{dir_name}_{:016x}",
            hasher.finish()
        ))
    }

    /// Snapshots `file_name` from the profile directory and opens it.
    /// The returned connection is the caller's to drop.
    pub fn open(
        &self,
        profile: &ProfileHandle,
        file_name: &str,
        kind: &str,
    ) -> Result<Connection, IngestError> {
        let source = profile.path.join(file_name);
        if !source.is_file() {
            return Err(IngestError::DatabaseMissing(source));
        }

        let copy = self.snapshot_path(profile, kind);
        self.copy_database(&source, &copy)?;

        Connection::open_with_flags(
            &copy,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|source| IngestError::SnapshotQueryFailure { path: copy, source })
    }

    fn copy_database(&self, source: &Path, copy: &Path) -> Result<(), IngestError> {
        fs::create_dir_all(&self.scratch_dir).map_err(|e| io_failure(&self.scratch_dir, e))?;
        fs::copy(source, copy).map_err(|e| match e.kind() {
            ErrorKind::NotFound => IngestError::DatabaseMissing(source.to_path_buf()),
            _ => io_failure(source, e),
        })?;

        // A shared-memory index left over from an older copy must not be
        // paired with the fresh log.
        remove_if_present(&sidecar(copy, SHM_SUFFIX))?;
        let source_wal = sidecar(source, WAL_SUFFIX);
        let copy_wal = sidecar(copy, WAL_SUFFIX);
        if source_wal.is_file() {
            fs::copy(&source_wal, &copy_wal).map_err(|e| io_failure(&source_wal, e))?;
        } else {
            remove_if_present(&copy_wal)?;
        }

        log::debug!("snapshot {} -> {}", source.display(), copy.display());
        Ok(())
    }
}

fn sidecar(path: &Path, suffix: &str) -> PathBuf {
    let mut raw = path.as_os_str().to_os_string();
    raw.push(suffix);
    PathBuf::from(raw)
}

fn remove_if_present(path: &Path) -> Result<(), IngestError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(io_failure(path, e)),
    }
}

fn io_failure(path: &Path, source: std::io::Error) -> IngestError {
    IngestError::SnapshotIOFailure {
        path: path.to_path_buf(),
        source,
    }
}
