use std::fmt::{Display, Formatter};
use std::path::PathBuf;

#[derive(Debug)]
pub enum IngestError {
    BrowserUnsupported(String),
    StorageRootNotFound {
        browser: String,
        candidates: Vec<PathBuf>,
    },
    MetadataUnreadable {
        path: PathBuf,
        reason: String,
    },
    MetadataShapeUnexpected {
        path: PathBuf,
        reason: String,
    },
    ProfilesDirMissing(PathBuf),
    ProfileNotFound(String),
    DatabaseMissing(PathBuf),
    SnapshotIOFailure {
        path: PathBuf,
        source: std::io::Error,
    },
    SnapshotQueryFailure {
        path: PathBuf,
        source: rusqlite::Error,
    },
}

impl IngestError {
    /// Errors that only take a single profile out of the session.
    pub fn is_profile_scoped(&self) -> bool {
        matches!(
            self,
            Self::DatabaseMissing(_)
                | Self::SnapshotIOFailure { .. }
                | Self::SnapshotQueryFailure { .. }
        )
    }
}

impl Display for IngestError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BrowserUnsupported(name) => write!(f, "browser '{name}' is not supported"),
            Self::StorageRootNotFound { browser, candidates } => {
                write!(f, "no user data directory found for '{browser}' (tried ")?;
                for (index, candidate) in candidates.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", candidate.display())?;
                }
                write!(f, ")")
            }
            Self::MetadataUnreadable { path, reason } => {
                write!(f, "cannot read profile metadata {}: {reason}", path.display())
            }
            Self::MetadataShapeUnexpected { path, reason } => {
                write!(f, "unexpected profile metadata in {}: {reason}", path.display())
            }
            Self::ProfilesDirMissing(path) => {
                write!(f, "profiles directory does not exist: {}", path.display())
            }
            Self::ProfileNotFound(name) => write!(f, "No profile with the name '{name}' was found."),
            Self::DatabaseMissing(path) => write!(f, "database file missing: {}", path.display()),
            Self::SnapshotIOFailure { path, source } => {
                write!(f, "snapshot of {} failed: {source}", path.display())
            }
            Self::SnapshotQueryFailure { path, source } => {
                write!(f, "reading snapshot {} failed: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for IngestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::SnapshotIOFailure { source, .. } => Some(source),
            Self::SnapshotQueryFailure { source, .. } => Some(source),
            _ => None,
        }
    }
}
