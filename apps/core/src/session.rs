use std::sync::{Arc, Mutex, MutexGuard, RwLock};
use std::time::{Duration, Instant};

use crate::action_executor::{self, LaunchError};
use crate::contract::ResultRecord;
use crate::error::IngestError;
use crate::ingest::{self, IngestOptions, IngestReport};
use crate::locator::BrowserContext;
use crate::model::{OpenAction, ResultLimit};
use crate::ranking;
use crate::snapshot::SnapshotReader;
use crate::store::HistoryStore;

/// Reloads closer together than this are dropped; the host fires
/// duplicate lifecycle events when the plugin is re-enabled.
pub const RELOAD_DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Debug)]
pub enum SessionError {
    Ingest(IngestError),
    Launch(LaunchError),
    InvalidRequest(String),
    NoBrowserContext,
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ingest(error) => write!(f, "ingest error: {error}"),
            Self::Launch(error) => write!(f, "launch error: {error}"),
            Self::InvalidRequest(message) => write!(f, "invalid request: {message}"),
            Self::NoBrowserContext => write!(f, "no browser has been configured"),
        }
    }
}

impl std::error::Error for SessionError {}

impl From<IngestError> for SessionError {
    fn from(value: IngestError) -> Self {
        Self::Ingest(value)
    }
}

impl From<LaunchError> for SessionError {
    fn from(value: LaunchError) -> Self {
        Self::Launch(value)
    }
}

/// The host's channel for telling the user about a problem.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, message: &str) {
        log::warn!("[notify] {message}");
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSettings {
    pub profile: Option<String>,
    pub max_results: ResultLimit,
    pub snapshots: SnapshotReader,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            profile: None,
            max_results: ResultLimit::Max(15),
            snapshots: SnapshotReader::default(),
        }
    }
}

#[derive(Debug)]
pub enum ReloadOutcome {
    Reloaded(IngestReport),
    Debounced,
    /// The previous store stays in place.
    Failed(IngestError),
}

pub struct HistorySession {
    settings: RwLock<SessionSettings>,
    context: RwLock<Option<BrowserContext>>,
    store: RwLock<Arc<HistoryStore>>,
    last_reload: Mutex<Option<Instant>>,
    notifier: Box<dyn Notifier>,
}

impl HistorySession {
    pub fn new(settings: SessionSettings) -> Self {
        Self::with_notifier(settings, Box::new(LogNotifier))
    }

    pub fn with_notifier(settings: SessionSettings, notifier: Box<dyn Notifier>) -> Self {
        Self {
            settings: RwLock::new(settings),
            context: RwLock::new(None),
            store: RwLock::new(Arc::new(HistoryStore::default())),
            last_reload: Mutex::new(None),
            notifier,
        }
    }

    /// Loads history for `context` unconditionally. A successful load
    /// starts the debounce window; after a failed one the next reload runs
    /// right away.
    pub fn initialize(&self, context: &BrowserContext) -> Result<IngestReport, IngestError> {
        let started = Instant::now();
        let report = self.load(context)?;
        *self.last_reload_guard() = Some(started);
        Ok(report)
    }

    pub fn reload(&self, context: &BrowserContext) -> ReloadOutcome {
        self.reload_at(context, Instant::now())
    }

    pub fn reload_at(&self, context: &BrowserContext, now: Instant) -> ReloadOutcome {
        if !self.mark_reload(now) {
            log::debug!("reload ignored; previous reload was under {RELOAD_DEBOUNCE:?} ago");
            return ReloadOutcome::Debounced;
        }
        match self.load(context) {
            Ok(report) => ReloadOutcome::Reloaded(report),
            Err(error) => ReloadOutcome::Failed(error),
        }
    }

    /// Reloads with the context of the last successful load.
    pub fn reload_current(&self) -> Result<ReloadOutcome, SessionError> {
        let context = self.current_context().ok_or(SessionError::NoBrowserContext)?;
        Ok(self.reload(&context))
    }

    pub fn update_settings(&self, settings: SessionSettings) {
        match self.settings.write() {
            Ok(mut guard) => *guard = settings,
            Err(poisoned) => *poisoned.into_inner() = settings,
        }
    }

    pub fn settings(&self) -> SessionSettings {
        match self.settings.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn current_context(&self) -> Option<BrowserContext> {
        match self.context.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// The store queries currently read from.
    pub fn store(&self) -> Arc<HistoryStore> {
        match self.store.read() {
            Ok(guard) => Arc::clone(&*guard),
            Err(poisoned) => Arc::clone(&*poisoned.into_inner()),
        }
    }

    pub fn query(&self, query: &str) -> Vec<ResultRecord> {
        self.query_with_limit(query, self.settings().max_results)
    }

    pub fn query_with_limit(&self, query: &str, limit: ResultLimit) -> Vec<ResultRecord> {
        let store = self.store();
        ranking::rank(&store, query.trim(), limit)
            .into_iter()
            .map(|ranked| ResultRecord::from_ranked(&ranked, store.icon_path()))
            .collect()
    }

    pub fn open(&self, action: &OpenAction) -> Result<(), SessionError> {
        action_executor::open_action(action).map_err(|error| {
            log::error!("couldn't open result: {error}");
            SessionError::from(error)
        })
    }

    /// Returns false when the previous reload is too recent.
    fn mark_reload(&self, now: Instant) -> bool {
        let mut last = self.last_reload_guard();
        if let Some(previous) = *last {
            if now.saturating_duration_since(previous) < RELOAD_DEBOUNCE {
                return false;
            }
        }
        *last = Some(now);
        true
    }

    fn last_reload_guard(&self) -> MutexGuard<'_, Option<Instant>> {
        match self.last_reload.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn load(&self, context: &BrowserContext) -> Result<IngestReport, IngestError> {
        let settings = self.settings();
        let options = IngestOptions {
            profile: settings.profile.clone(),
            snapshots: settings.snapshots.clone(),
        };
        match ingest::ingest(context, &options) {
            Ok((store, report)) => {
                match self.context.write() {
                    Ok(mut guard) => *guard = Some(context.clone()),
                    Err(poisoned) => *poisoned.into_inner() = Some(context.clone()),
                }
                for notice in &report.notices {
                    self.notifier.notify(notice);
                }
                let fresh = Arc::new(store);
                match self.store.write() {
                    Ok(mut guard) => *guard = fresh,
                    Err(poisoned) => *poisoned.into_inner() = fresh,
                }
                Ok(report)
            }
            Err(error) => {
                log::error!("loading history for '{}' failed: {error}", context.identifier);
                self.notifier.notify(&error.to_string());
                Err(error)
            }
        }
    }
}
