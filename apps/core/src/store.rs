use crate::adapter::{PredictionSignal, ProfileHistory};
use crate::model::{BrowserFamily, HistoryEntry};

/// All entries and the merged signal of one session. Built completely by
/// ingestion and read-only once published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryStore {
    family: BrowserFamily,
    icon_path: String,
    entries: Vec<HistoryEntry>,
    signal: PredictionSignal,
    profiles_loaded: usize,
}

impl HistoryStore {
    pub fn empty(family: BrowserFamily) -> Self {
        Self {
            family,
            icon_path: String::new(),
            entries: Vec::new(),
            signal: PredictionSignal::empty(family),
            profiles_loaded: 0,
        }
    }

    pub fn with_icon_path(mut self, icon_path: &str) -> Self {
        self.icon_path = icon_path.to_string();
        self
    }

    /// Appends a profile after the ones already merged.
    pub fn merge_profile(&mut self, history: ProfileHistory) {
        self.entries.extend(history.entries);
        self.signal.merge(history.signal);
        self.profiles_loaded += 1;
    }

    pub fn family(&self) -> BrowserFamily {
        self.family
    }

    pub fn icon_path(&self) -> &str {
        &self.icon_path
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn signal(&self) -> &PredictionSignal {
        &self.signal
    }

    pub fn profiles_loaded(&self) -> usize {
        self.profiles_loaded
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::empty(BrowserFamily::Chromium)
    }
}
