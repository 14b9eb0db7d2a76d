//! Windowed fan-out of metadata lookups for a creator's other tokens.
//!
//! Lookups inside a window run concurrently; the next window starts only after
//! every lookup in the current one has settled. Peak concurrency is therefore
//! the window size.

use futures::future::join_all;
use std::collections::HashSet;
use std::future::Future;
use tracing::debug;

use crate::models::{EnrichmentMap, NftMetadata};

/// Default number of lookups issued together
pub const ENRICHMENT_WINDOW: usize = 5;

/// Result of a windowed enrichment run
#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    /// Metadata for every mint that resolved
    pub resolved: EnrichmentMap,
    /// Mints whose lookup yielded nothing, in input order
    pub absent: Vec<String>,
    /// Number of windows executed
    pub windows: usize,
}

/// Runs `fetch` for each distinct mint, `window` at a time.
///
/// Duplicate mints are looked up once. A window size of zero is treated as one.
pub async fn enrich_in_windows<F, Fut>(mints: &[String], window: usize, fetch: F) -> BatchOutcome
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = Option<NftMetadata>>,
{
    let window = window.max(1);
    let mut seen = HashSet::new();
    let unique: Vec<&String> = mints.iter().filter(|m| seen.insert(m.as_str())).collect();

    let mut outcome = BatchOutcome::default();

    for (index, chunk) in unique.chunks(window).enumerate() {
        debug!("Enrichment window {} with {} lookups", index + 1, chunk.len());

        let results = join_all(chunk.iter().map(|mint| {
            let lookup = fetch((*mint).clone());
            async move { ((*mint).clone(), lookup.await) }
        }))
        .await;

        for (mint, meta) in results {
            match meta {
                Some(meta) => {
                    outcome.resolved.insert(mint, meta);
                }
                None => outcome.absent.push(mint),
            }
        }
        outcome.windows += 1;
    }

    debug!(
        "Enrichment finished: {} resolved, {} absent, {} windows",
        outcome.resolved.len(),
        outcome.absent.len(),
        outcome.windows
    );
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    fn mints(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("MINT{}", i)).collect()
    }

    fn named(mint: &str) -> NftMetadata {
        NftMetadata {
            name: Some(format!("{} name", mint)),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_window_count_is_ceiling() {
        for (n, expected) in [(0, 0), (1, 1), (5, 1), (6, 2), (12, 3)] {
            let outcome =
                enrich_in_windows(&mints(n), ENRICHMENT_WINDOW, |m| async move { Some(named(&m)) })
                    .await;
            assert_eq!(outcome.windows, expected, "n = {}", n);
            assert_eq!(outcome.resolved.len(), n);
        }
    }

    #[tokio::test]
    async fn test_every_mint_is_resolved_or_absent_once() {
        let input = mints(11);
        let outcome = enrich_in_windows(&input, ENRICHMENT_WINDOW, |m| async move {
            let index: usize = m.trim_start_matches("MINT").parse().unwrap();
            if index % 3 == 0 {
                None
            } else {
                Some(named(&m))
            }
        })
        .await;

        assert_eq!(outcome.absent, vec!["MINT0", "MINT3", "MINT6", "MINT9"]);
        assert_eq!(outcome.resolved.len(), 7);
        for mint in &input {
            let in_resolved = outcome.resolved.contains_key(mint);
            let in_absent = outcome.absent.contains(mint);
            assert!(in_resolved ^ in_absent, "{} must appear exactly once", mint);
        }
    }

    #[tokio::test]
    async fn test_windows_do_not_overlap() {
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let events = Arc::new(Mutex::new(Vec::new()));

        let outcome = enrich_in_windows(&mints(13), ENRICHMENT_WINDOW, |m| {
            let in_flight = in_flight.clone();
            let peak = peak.clone();
            let events = events.clone();
            async move {
                let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                events.lock().unwrap().push(("start", m.clone()));

                tokio::task::yield_now().await;
                tokio::task::yield_now().await;

                events.lock().unwrap().push(("end", m.clone()));
                in_flight.fetch_sub(1, Ordering::SeqCst);
                Some(named(&m))
            }
        })
        .await;

        assert_eq!(outcome.windows, 3);
        assert!(peak.load(Ordering::SeqCst) <= ENRICHMENT_WINDOW);

        // Every start in window k+1 comes after every end in window k.
        let events = events.lock().unwrap();
        let window_of = |m: &str| m.trim_start_matches("MINT").parse::<usize>().unwrap() / 5;
        for (pos, (kind, mint)) in events.iter().enumerate() {
            if *kind != "start" {
                continue;
            }
            let w = window_of(mint);
            let later_end_of_earlier_window = events[pos..]
                .iter()
                .any(|(k, m)| *k == "end" && window_of(m) < w);
            assert!(!later_end_of_earlier_window, "{} started before window {} settled", mint, w);
        }
    }

    #[test]
    fn test_duplicates_are_fetched_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let input = vec!["A".to_string(), "B".to_string(), "A".to_string()];

        let outcome = tokio_test::block_on(enrich_in_windows(&input, ENRICHMENT_WINDOW, |m| {
            let calls = calls.clone();
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Some(named(&m))
            }
        }));

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(outcome.resolved.len(), 2);
    }
}
