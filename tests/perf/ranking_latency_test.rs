use std::time::Instant;

use crate::adapter::{PredictionSignal, ProfileHistory};
use crate::model::{BrowserFamily, HistoryEntry, ResultLimit};
use crate::ranking::rank;
use crate::store::HistoryStore;

fn p95_ms(samples: &mut [f64]) -> f64 {
    samples.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let last = samples.len().saturating_sub(1);
    let idx = ((last as f64) * 0.95).round() as usize;
    samples[idx.min(last)]
}

#[test]
fn warm_query_p95_under_40ms() {
    let mut entries: Vec<HistoryEntry> = (0..10_000)
        .map(|i| {
            HistoryEntry::new(
                &format!("https://example.com/articles/{i:05}?ref=feed"),
                &format!("Example article number {i:05} - Example News"),
                (10_000 - i) as i64,
            )
        })
        .collect();
    entries.push(HistoryEntry::new(
        "https://github.com/rust-lang/rust",
        "rust-lang/rust: Empowering everyone to build reliable software",
        3,
    ));

    let mut signal = PredictionSignal::empty(BrowserFamily::Chromium);
    signal.add_prediction("rust".into(), "https://github.com/rust-lang/rust".into(), 12);
    let mut store = HistoryStore::empty(BrowserFamily::Chromium);
    store.merge_profile(ProfileHistory { entries, signal });

    for _ in 0..20 {
        let _ = rank(&store, "rust", ResultLimit::Max(15));
    }

    let mut batch_p95 = Vec::with_capacity(5);
    for _ in 0..5 {
        let mut samples = Vec::with_capacity(40);
        for _ in 0..40 {
            let start = Instant::now();
            let _ = rank(&store, "article", ResultLimit::Max(15));
            samples.push(start.elapsed().as_secs_f64() * 1000.0);
        }
        batch_p95.push(p95_ms(&mut samples));
    }

    batch_p95.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let median_p95 = batch_p95[batch_p95.len() / 2];

    assert!(
        median_p95 <= 40.0,
        "median batch p95 too high: {median_p95:.3}ms (budget 40.0ms); batches={batch_p95:?}",
    );

    let top = rank(&store, "rust", ResultLimit::Max(15));
    assert_eq!(top[0].entry.url, "https://github.com/rust-lang/rust");
}
