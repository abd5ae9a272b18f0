use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::ingest::IngestReport;
use crate::model::{OpenAction, RankedResult};

/// One row handed to the host.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResultRecord {
    pub title: String,
    pub subtitle: String,
    pub icon_path: String,
    /// Absent for the empty query, which lists entries without scoring.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<i64>,
    pub action: OpenAction,
}

impl ResultRecord {
    pub fn from_ranked(ranked: &RankedResult<'_>, icon_path: &str) -> Self {
        Self {
            title: ranked.entry.title.clone(),
            subtitle: ranked.entry.url.clone(),
            icon_path: icon_path.to_string(),
            score: ranked.score,
            action: ranked.entry.action.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QueryRequest {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub max_results: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QueryResponse {
    pub results: Vec<ResultRecord>,
}

/// Omitted fields fall back to the context of the previous load.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ReloadRequest {
    #[serde(default)]
    pub browser: Option<String>,
    #[serde(default)]
    pub local_app_data: Option<PathBuf>,
    #[serde(default)]
    pub roaming_app_data: Option<PathBuf>,
    #[serde(default)]
    pub icon_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReloadResponse {
    pub reloaded: bool,
    pub browser: Option<String>,
    pub profiles_loaded: usize,
    pub profiles_skipped: usize,
    pub entries: usize,
}

impl ReloadResponse {
    pub fn debounced() -> Self {
        Self {
            reloaded: false,
            browser: None,
            profiles_loaded: 0,
            profiles_skipped: 0,
            entries: 0,
        }
    }
}

impl From<&IngestReport> for ReloadResponse {
    fn from(value: &IngestReport) -> Self {
        Self {
            reloaded: true,
            browser: Some(value.browser.clone()),
            profiles_loaded: value.profiles_loaded,
            profiles_skipped: value.skipped.len(),
            entries: value.entries,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OpenRequest {
    pub action: OpenAction,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OpenResponse {
    pub opened: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "payload", rename_all = "snake_case")]
pub enum CoreRequest {
    Query(QueryRequest),
    Reload(ReloadRequest),
    Open(OpenRequest),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "payload", rename_all = "snake_case")]
pub enum CoreResponse {
    Query(QueryResponse),
    Reload(ReloadResponse),
    Open(OpenResponse),
}
