use browsersearch_core::adapter::{PredictionSignal, ProfileHistory};
use browsersearch_core::model::{BrowserFamily, HistoryEntry, ResultLimit};
use browsersearch_core::ranking::{rank, score, BROWSE_DEFAULT_LIMIT};
use browsersearch_core::store::HistoryStore;

fn store_of(family: BrowserFamily, entries: Vec<HistoryEntry>, signal: PredictionSignal) -> HistoryStore {
    let mut store = HistoryStore::empty(family);
    store.merge_profile(ProfileHistory { entries, signal });
    store
}

fn chromium(entries: Vec<HistoryEntry>) -> HistoryStore {
    store_of(
        BrowserFamily::Chromium,
        entries,
        PredictionSignal::empty(BrowserFamily::Chromium),
    )
}

fn sample_entries() -> Vec<HistoryEntry> {
    vec![
        HistoryEntry::new("https://github.com", "GitHub", 40),
        HistoryEntry::new("https://docs.rs", "Docs.rs", 12),
        HistoryEntry::new("https://gitlab.com/explore", "Explore projects · GitLab", 3),
        HistoryEntry::new("https://news.ycombinator.com", "Hacker News", 9),
        HistoryEntry::new("https://git-scm.com/docs", "Git - Reference", 1),
    ]
}

#[test]
fn entries_without_the_query_are_excluded() {
    let store = chromium(sample_entries());

    let results = rank(&store, "git", ResultLimit::Unlimited);

    assert_eq!(results.len(), 3);
    assert!(results
        .iter()
        .all(|r| r.entry.lowered_title().contains("git") || r.entry.lowered_url().contains("git")));
    assert!(results.iter().all(|r| r.score.unwrap_or(0) > 0));
}

#[test]
fn results_are_ordered_by_descending_score() {
    let store = chromium(sample_entries());

    let results = rank(&store, "git", ResultLimit::Unlimited);
    let scores: Vec<i64> = results.iter().filter_map(|r| r.score).collect();

    assert!(scores.windows(2).all(|pair| pair[0] >= pair[1]));
    assert_eq!(results[0].entry.title, "GitHub");
}

#[test]
fn limit_keeps_the_highest_scores() {
    let store = chromium(sample_entries());

    let all = rank(&store, "git", ResultLimit::Unlimited);
    let top = rank(&store, "git", ResultLimit::Max(2));

    assert_eq!(top.len(), 2);
    assert_eq!(top[0].entry.url, all[0].entry.url);
    assert_eq!(top[1].entry.url, all[1].entry.url);
}

#[test]
fn matching_is_case_insensitive() {
    let store = chromium(vec![HistoryEntry::new("https://example.org", "RUST", 1)]);

    assert_eq!(score(&store, &store.entries()[0], "rust"), 100);
    assert_eq!(score(&store, &store.entries()[0], "Ru"), 50);
}

#[test]
fn empty_query_lists_the_store_head_unscored() {
    let entries: Vec<HistoryEntry> = (0..40)
        .map(|i| HistoryEntry::from_owned(format!("https://site{i}.test"), format!("Site {i}"), 40 - i))
        .collect();
    let store = chromium(entries);

    let limited = rank(&store, "", ResultLimit::Max(5));
    assert_eq!(limited.len(), 5);
    assert!(limited.iter().all(|r| r.score.is_none()));
    assert_eq!(limited[0].entry.title, "Site 0");
    assert_eq!(limited[4].entry.title, "Site 4");

    let unlimited = rank(&store, "", ResultLimit::Unlimited);
    assert_eq!(unlimited.len(), BROWSE_DEFAULT_LIMIT);
}

#[test]
fn unlimited_returns_every_match() {
    let entries: Vec<HistoryEntry> = (0..100)
        .map(|i| HistoryEntry::from_owned(format!("https://page{i}.test"), format!("Page {i}"), i))
        .collect();
    let store = chromium(entries);

    assert_eq!(rank(&store, "page", ResultLimit::Unlimited).len(), 100);
    assert_eq!(rank(&store, "page", ResultLimit::Max(15)).len(), 15);
}

#[test]
fn firefox_frecency_needs_a_lexical_match() {
    let mut signal = PredictionSignal::empty(BrowserFamily::Firefox);
    signal.set_frecency("https://docs.rs", "Docs.rs", 45_000);
    signal.set_frecency("https://crates.io", "crates.io", 99_000);
    let store = store_of(
        BrowserFamily::Firefox,
        vec![
            HistoryEntry::new("https://docs.rs", "Docs.rs", 45_000),
            HistoryEntry::new("https://crates.io", "crates.io", 99_000),
        ],
        signal,
    );

    let results = rank(&store, "docs", ResultLimit::Unlimited);

    assert_eq!(results.len(), 1);
    // 4 / 7 of "Docs.rs" plus 45_000 / 1000.
    assert_eq!(results[0].score, Some(57 + 45));
}

#[test]
fn chromium_prediction_can_surface_a_non_matching_entry() {
    let mut signal = PredictionSignal::empty(BrowserFamily::Chromium);
    signal.add_prediction("mail".into(), "https://outlook.live.com".into(), 4);
    let store = store_of(
        BrowserFamily::Chromium,
        vec![HistoryEntry::new("https://outlook.live.com", "Outlook", 2)],
        signal,
    );

    let results = rank(&store, "mail", ResultLimit::Unlimited);

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].score, Some(4));
}

#[test]
fn chromium_ties_keep_store_order_across_profiles() {
    let mut store = HistoryStore::empty(BrowserFamily::Chromium);
    store.merge_profile(ProfileHistory {
        entries: vec![HistoryEntry::new("https://a.test/rust", "rust", 1)],
        signal: PredictionSignal::empty(BrowserFamily::Chromium),
    });
    store.merge_profile(ProfileHistory {
        entries: vec![HistoryEntry::new("https://b.test/rust", "rust", 50)],
        signal: PredictionSignal::empty(BrowserFamily::Chromium),
    });

    let top = rank(&store, "rust", ResultLimit::Max(1));
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].entry.url, "https://a.test/rust");
    assert_eq!(top[0].score, Some(100));

    let all = rank(&store, "rust", ResultLimit::Unlimited);
    let urls: Vec<&str> = all.iter().map(|r| r.entry.url.as_str()).collect();
    assert_eq!(urls, vec!["https://a.test/rust", "https://b.test/rust"]);
}

#[test]
fn firefox_ties_prefer_the_higher_frecency() {
    let store = store_of(
        BrowserFamily::Firefox,
        vec![
            HistoryEntry::new("https://a.test/rust", "rust", 1_200),
            HistoryEntry::new("https://b.test/rust", "rust", 1_900),
            HistoryEntry::new("https://c.test/rust", "rust", 1_900),
        ],
        PredictionSignal::empty(BrowserFamily::Firefox),
    );

    let results = rank(&store, "rust", ResultLimit::Unlimited);
    let urls: Vec<&str> = results.iter().map(|r| r.entry.url.as_str()).collect();

    assert_eq!(
        urls,
        vec!["https://b.test/rust", "https://c.test/rust", "https://a.test/rust"]
    );
    assert_eq!(rank(&store, "rust", ResultLimit::Max(1))[0].entry.url, "https://b.test/rust");
}

#[test]
fn case_folding_that_grows_the_text_stays_within_one_hundred() {
    let store = chromium(vec![HistoryEntry::new("https://example.org", "\u{130}stanbul", 1)]);

    assert_eq!(score(&store, &store.entries()[0], "i\u{307}stanbul"), 100);
    assert_eq!(score(&store, &store.entries()[0], "\u{130}STANBUL"), 100);
}

#[test]
fn empty_store_yields_nothing() {
    let store = HistoryStore::empty(BrowserFamily::Firefox);

    assert!(rank(&store, "anything", ResultLimit::Unlimited).is_empty());
    assert!(rank(&store, "", ResultLimit::Max(10)).is_empty());
}
