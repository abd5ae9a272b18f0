use std::cmp::Ordering;

use crate::model::{BrowserFamily, HistoryEntry, RankedResult, ResultLimit};
use crate::store::HistoryStore;

/// How many entries the empty query shows when results are unlimited.
pub const BROWSE_DEFAULT_LIMIT: usize = 15;

type Scored<'a> = (i64, usize, &'a HistoryEntry);
type RankOrder = for<'x, 'y, 'z> fn(&'x Scored<'z>, &'y Scored<'z>) -> Ordering;

/// Scores every entry against `query` in one pass and returns the best
/// ones, highest score first. An empty query browses the head of the
/// store instead of searching.
pub fn rank<'a>(store: &'a HistoryStore, query: &str, limit: ResultLimit) -> Vec<RankedResult<'a>> {
    if query.is_empty() {
        return browse(store, limit);
    }
    if limit == ResultLimit::Max(0) || store.is_empty() {
        return Vec::new();
    }

    let lowered_query = query.to_lowercase();
    let query_len = lowered_query.chars().count();
    let order = rank_order(store.family());

    let mut scored: Vec<Scored<'a>> = store
        .entries()
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            let score = score_entry(store, entry, query, &lowered_query, query_len);
            (score > 0).then_some((score, index, entry))
        })
        .collect();

    if let ResultLimit::Max(k) = limit {
        if scored.len() > k {
            scored.select_nth_unstable_by(k - 1, order);
            scored.truncate(k);
        }
    }
    scored.sort_unstable_by(order);

    scored
        .into_iter()
        .map(|(score, _, entry)| RankedResult {
            entry,
            score: Some(score),
        })
        .collect()
}

/// Chromium rows already arrive most-visited first, so equal scores keep
/// store order. Firefox ties go to the higher frecency.
fn rank_order(family: BrowserFamily) -> RankOrder {
    match family {
        BrowserFamily::Chromium => by_score as RankOrder,
        BrowserFamily::Firefox => by_score_then_metric as RankOrder,
    }
}

fn by_score(a: &Scored<'_>, b: &Scored<'_>) -> Ordering {
    b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1))
}

fn by_score_then_metric(a: &Scored<'_>, b: &Scored<'_>) -> Ordering {
    b.0.cmp(&a.0)
        .then_with(|| b.2.metric.cmp(&a.2.metric))
        .then_with(|| a.1.cmp(&b.1))
}

pub fn browse(store: &HistoryStore, limit: ResultLimit) -> Vec<RankedResult<'_>> {
    let take = match limit {
        ResultLimit::Max(k) => k,
        ResultLimit::Unlimited => BROWSE_DEFAULT_LIMIT,
    };
    store
        .entries()
        .iter()
        .take(take)
        .map(|entry| RankedResult { entry, score: None })
        .collect()
}

/// `floor(max(title_score, url_score) + bonus)` for a single entry.
pub fn score(store: &HistoryStore, entry: &HistoryEntry, query: &str) -> i64 {
    if query.is_empty() {
        return 0;
    }
    let lowered_query = query.to_lowercase();
    let query_len = lowered_query.chars().count();
    score_entry(store, entry, query, &lowered_query, query_len)
}

fn score_entry(
    store: &HistoryStore,
    entry: &HistoryEntry,
    query: &str,
    lowered_query: &str,
    query_len: usize,
) -> i64 {
    let title_score = lexical_score(entry.lowered_title(), lowered_query, query_len);
    let url_score = lexical_score(entry.lowered_url(), lowered_query, query_len);
    let lexical_match = title_score > 0.0 || url_score > 0.0;
    let base = title_score.max(url_score);
    let bonus = store
        .signal()
        .bonus(query, &entry.title, &entry.url, lexical_match);

    (base + bonus as f64).floor() as i64
}

/// Share of the haystack covered by the query, as a percentage. Both
/// lengths are taken from the lower-cased text the match ran on, so the
/// share never exceeds 100.
fn lexical_score(lowered: &str, lowered_query: &str, query_len: usize) -> f64 {
    if !lowered.contains(lowered_query) {
        return 0.0;
    }
    let len = lowered.chars().count();
    if len == 0 {
        return 0.0;
    }
    (query_len as f64 * 100.0) / len as f64
}
