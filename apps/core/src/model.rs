use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BrowserFamily {
    Chromium,
    Firefox,
}

/// What happens when a result is invoked. Interpreted by `action_executor`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OpenAction {
    OpenUrl { url: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub url: String,
    pub title: String,
    /// `visit_count` for Chromium profiles, `frecency` for Firefox profiles.
    pub metric: i64,
    pub action: OpenAction,
    lowered_url: String,
    lowered_title: String,
}

impl HistoryEntry {
    pub fn new(url: &str, title: &str, metric: i64) -> Self {
        Self::from_owned(url.to_string(), title.to_string(), metric)
    }

    pub fn from_owned(url: String, title: String, metric: i64) -> Self {
        let lowered_url = url.to_lowercase();
        let lowered_title = title.to_lowercase();
        let action = OpenAction::OpenUrl { url: url.clone() };
        Self {
            url,
            title,
            metric,
            action,
            lowered_url,
            lowered_title,
        }
    }

    pub fn lowered_url(&self) -> &str {
        &self.lowered_url
    }

    pub fn lowered_title(&self) -> &str {
        &self.lowered_title
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankedResult<'a> {
    pub entry: &'a HistoryEntry,
    /// `None` on the empty-query path, where nothing is scored.
    pub score: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResultLimit {
    Max(usize),
    #[default]
    Unlimited,
}

impl ResultLimit {
    pub const UNLIMITED_SENTINEL: i64 = -1;

    /// Maps the host's integer setting; `-1` means unlimited.
    pub fn from_setting(value: i64) -> Option<Self> {
        match value {
            Self::UNLIMITED_SENTINEL => Some(Self::Unlimited),
            v if v >= 0 => Some(Self::Max(v as usize)),
            _ => None,
        }
    }

    pub fn as_setting(self) -> i64 {
        match self {
            Self::Max(k) => k as i64,
            Self::Unlimited => Self::UNLIMITED_SENTINEL,
        }
    }
}
