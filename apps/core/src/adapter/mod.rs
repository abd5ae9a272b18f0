use std::collections::HashMap;
use std::path::Path;

use crate::error::IngestError;
use crate::locator::{BrowserKind, LocatedBrowser};
use crate::model::{BrowserFamily, HistoryEntry};
use crate::profiles::{ProfileHandle, ProfileIndex};
use crate::snapshot::SnapshotReader;

pub mod chromium;
pub mod firefox;

pub use chromium::ChromiumAdapter;
pub use firefox::FirefoxAdapter;

/// A URL the browser previously autocompleted for a typed text, with the
/// number of times the user picked it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prediction {
    pub url: String,
    pub hits: i64,
}

/// Secondary relevance signal, one shape per browser family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PredictionSignal {
    /// user text → predictions, in insertion order.
    Chromium(HashMap<String, Vec<Prediction>>),
    /// url → title → frecency.
    Firefox(HashMap<String, HashMap<String, i64>>),
}

impl PredictionSignal {
    pub fn empty(family: BrowserFamily) -> Self {
        match family {
            BrowserFamily::Chromium => Self::Chromium(HashMap::new()),
            BrowserFamily::Firefox => Self::Firefox(HashMap::new()),
        }
    }

    pub fn family(&self) -> BrowserFamily {
        match self {
            Self::Chromium(_) => BrowserFamily::Chromium,
            Self::Firefox(_) => BrowserFamily::Firefox,
        }
    }

    pub fn add_prediction(&mut self, user_text: String, url: String, hits: i64) {
        if let Self::Chromium(predictions) = self {
            predictions
                .entry(user_text)
                .or_default()
                .push(Prediction { url, hits });
        }
    }

    pub fn set_frecency(&mut self, url: &str, title: &str, frecency: i64) {
        if let Self::Firefox(frecency_by_url) = self {
            frecency_by_url
                .entry(url.to_string())
                .or_default()
                .insert(title.to_string(), frecency);
        }
    }

    pub fn merge(&mut self, other: PredictionSignal) {
        match (self, other) {
            (Self::Chromium(ours), Self::Chromium(theirs)) => {
                for (user_text, predictions) in theirs {
                    ours.entry(user_text).or_default().extend(predictions);
                }
            }
            (Self::Firefox(ours), Self::Firefox(theirs)) => {
                for (url, titles) in theirs {
                    ours.entry(url).or_default().extend(titles);
                }
            }
            (ours, theirs) => log::warn!(
                "dropping {:?} signal merged into {:?} store",
                theirs.family(),
                ours.family()
            ),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Chromium(predictions) => predictions.is_empty(),
            Self::Firefox(frecency_by_url) => frecency_by_url.is_empty(),
        }
    }

    /// Bonus added to the lexical score. `lexical_match` tells whether the
    /// query already occurs in the title or url.
    pub fn bonus(&self, query: &str, title: &str, url: &str, lexical_match: bool) -> i64 {
        match self {
            Self::Chromium(predictions) => predictions
                .get(query)
                .and_then(|candidates| candidates.iter().find(|p| p.url == url))
                .map(|p| p.hits)
                .unwrap_or(0),
            Self::Firefox(frecency_by_url) => {
                if !lexical_match {
                    return 0;
                }
                frecency_by_url
                    .get(url)
                    .and_then(|titles| titles.get(title))
                    .map(|frecency| frecency / 1000)
                    .unwrap_or(0)
            }
        }
    }

    pub fn extra_score(&self, query: &str, title: &str, url: &str) -> i64 {
        let lowered_query = query.to_lowercase();
        let lexical_match = title.to_lowercase().contains(&lowered_query)
            || url.to_lowercase().contains(&lowered_query);
        self.bonus(query, title, url, lexical_match)
    }
}

/// Everything one profile contributes to a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileHistory {
    pub entries: Vec<HistoryEntry>,
    pub signal: PredictionSignal,
}

impl ProfileHistory {
    pub fn empty(family: BrowserFamily) -> Self {
        Self {
            entries: Vec::new(),
            signal: PredictionSignal::empty(family),
        }
    }
}

pub trait SchemaAdapter: Send + Sync {
    fn family(&self) -> BrowserFamily;
    fn resolve_profiles(&self, storage_root: &Path) -> Result<ProfileIndex, IngestError>;
    fn ingest_profile(
        &self,
        profile: &ProfileHandle,
        snapshots: &SnapshotReader,
    ) -> Result<ProfileHistory, IngestError>;
}

pub fn adapter_for(browser: &LocatedBrowser) -> Box<dyn SchemaAdapter> {
    match browser.kind {
        BrowserKind::Chromium(layout) => Box::new(ChromiumAdapter::new(layout)),
        BrowserKind::Firefox => Box::new(FirefoxAdapter),
    }
}
