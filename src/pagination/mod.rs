//! "Load more" pagination over a seeded post list.
//!
//! The [`Accumulator`] owns the list and the cursor for the page after it.
//! It is either idle or loading exactly one page; a `load_more` issued while a
//! page is in flight is ignored rather than queued.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::app::{FetchError, Result};
use crate::domain::{MergeStats, PaginationCursor, PaginationState, PostSummary};
use crate::fetcher::PageFetcher;
use crate::normalizer::Normalizer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A page was fetched and merged.
    Loaded(MergeStats),
    /// Another load was in flight; nothing was started.
    AlreadyLoading,
    /// The cursor is at the end; there is nothing left to load.
    Exhausted,
}

struct Inner {
    state: PaginationState,
    loading: bool,
}

/// A panic while the lock is held cannot leave `state` half-merged:
/// `merge_page` builds the new items before touching the list, then writes
/// items and cursor back to back. A poisoned lock still guards a consistent
/// state, so it is recovered instead of propagated.
fn lock(inner: &Mutex<Inner>) -> MutexGuard<'_, Inner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Clears the loading flag when a load ends, including when its future is
/// dropped before the fetch resolves.
struct LoadingGuard<'a> {
    inner: &'a Mutex<Inner>,
    armed: bool,
}

impl LoadingGuard<'_> {
    fn complete<T>(mut self, f: impl FnOnce(&mut PaginationState) -> T) -> T {
        let mut inner = lock(self.inner);
        let out = f(&mut inner.state);
        inner.loading = false;
        self.armed = false;
        out
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            lock(self.inner).loading = false;
        }
    }
}

pub struct Accumulator {
    inner: Mutex<Inner>,
    fetcher: Arc<dyn PageFetcher + Send + Sync>,
    normalizer: Normalizer,
    double_loads: AtomicU64,
}

impl Accumulator {
    pub fn new(
        seed: PaginationState,
        fetcher: Arc<dyn PageFetcher + Send + Sync>,
        normalizer: Normalizer,
    ) -> Self {
        Self {
            inner: Mutex::new(Inner {
                state: seed,
                loading: false,
            }),
            fetcher,
            normalizer,
            double_loads: AtomicU64::new(0),
        }
    }

    pub fn snapshot(&self) -> PaginationState {
        lock(&self.inner).state.clone()
    }

    pub fn items(&self) -> Vec<PostSummary> {
        lock(&self.inner).state.items().to_vec()
    }

    pub fn cursor(&self) -> PaginationCursor {
        lock(&self.inner).state.cursor().clone()
    }

    pub fn has_more(&self) -> bool {
        lock(&self.inner).state.has_more()
    }

    pub fn is_loading(&self) -> bool {
        lock(&self.inner).loading
    }

    /// Number of `load_more` calls ignored because a page was already loading.
    pub fn double_loads(&self) -> u64 {
        self.double_loads.load(Ordering::Relaxed)
    }

    /// Fetch the next page and merge it.
    ///
    /// On failure the list and cursor are left exactly as they were, so the
    /// call can simply be repeated.
    pub async fn load_more(&self) -> Result<LoadOutcome> {
        let token = {
            let mut inner = lock(&self.inner);
            if inner.loading {
                self.double_loads.fetch_add(1, Ordering::Relaxed);
                tracing::debug!("Ignoring load_more: a page is already loading");
                return Ok(LoadOutcome::AlreadyLoading);
            }
            let Some(token) = inner.state.cursor().token().cloned() else {
                return Ok(LoadOutcome::Exhausted);
            };
            inner.loading = true;
            token
        };
        let guard = LoadingGuard {
            inner: &self.inner,
            armed: true,
        };

        let page = match self.fetcher.fetch_page(&token).await {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!("Failed to load page {}: {}", token, e);
                return Err(e.into());
            }
        };

        let posts = match self.normalizer.normalize_page(&page.results) {
            Ok(posts) => posts,
            Err(e) => {
                tracing::warn!("Rejecting page {}: {}", token, e);
                return Err(FetchError::Document(e.to_string()).into());
            }
        };
        let next = PaginationCursor::from_next_page(page.next_page);

        let stats = guard.complete(|state| state.merge_page(posts, next));
        tracing::info!(
            "Loaded page {}: {} new posts, {} duplicates skipped",
            token,
            stats.added,
            stats.skipped
        );

        Ok(LoadOutcome::Loaded(stats))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::BlogError;
    use crate::domain::{PageToken, RawDocument};
    use crate::fetcher::scripted::{doc, page, ScriptedFetcher};
    use reqwest::StatusCode;

    const PAGE2: &str = "https://cms/page2";

    fn seed(ids: &[&str], next: Option<&str>) -> PaginationState {
        let items = ids
            .iter()
            .map(|id| {
                let mut post = PostSummary::new(*id);
                post.title = id.to_uppercase();
                post
            })
            .collect();
        PaginationState::new(items, PaginationCursor::from_next_page(next.map(String::from)))
    }

    fn accumulator(state: PaginationState, fetcher: Arc<ScriptedFetcher>) -> Accumulator {
        Accumulator::new(state, fetcher, Normalizer::new())
    }

    fn ids(acc: &Accumulator) -> Vec<String> {
        acc.items().into_iter().map(|p| p.id).collect()
    }

    #[tokio::test]
    async fn test_load_last_page() {
        let fetcher = Arc::new(ScriptedFetcher::new().reply(page(&["p2"], None)));
        let acc = accumulator(seed(&["p1"], Some(PAGE2)), fetcher.clone());
        assert!(acc.has_more());

        let outcome = acc.load_more().await.unwrap();

        assert_eq!(outcome, LoadOutcome::Loaded(MergeStats { added: 1, skipped: 0 }));
        assert_eq!(ids(&acc), vec!["p1", "p2"]);
        assert_eq!(acc.cursor(), PaginationCursor::End);
        assert!(!acc.has_more());
        assert_eq!(fetcher.requested(), vec![PageToken::new(PAGE2)]);
    }

    #[tokio::test]
    async fn test_terminal_seed_never_fetches() {
        let fetcher = Arc::new(ScriptedFetcher::new());
        let acc = accumulator(seed(&["p1"], None), fetcher.clone());

        assert!(!acc.has_more());
        assert_eq!(acc.load_more().await.unwrap(), LoadOutcome::Exhausted);
        assert_eq!(fetcher.calls(), 0);
        assert_eq!(ids(&acc), vec!["p1"]);
    }

    #[tokio::test]
    async fn test_terminal_state_is_stable() {
        let fetcher = Arc::new(ScriptedFetcher::new().reply(page(&["p2"], None)));
        let acc = accumulator(seed(&["p1"], Some(PAGE2)), fetcher.clone());
        acc.load_more().await.unwrap();
        let settled = acc.snapshot();

        for _ in 0..5 {
            assert_eq!(acc.load_more().await.unwrap(), LoadOutcome::Exhausted);
        }

        assert_eq!(acc.snapshot(), settled);
        assert_eq!(fetcher.calls(), 1);
    }

    #[tokio::test]
    async fn test_failed_fetch_leaves_state_untouched_and_retry_works() {
        let fetcher = Arc::new(
            ScriptedFetcher::new()
                .fail(StatusCode::SERVICE_UNAVAILABLE)
                .reply(page(&["p2"], None)),
        );
        let acc = accumulator(seed(&["p1"], Some(PAGE2)), fetcher.clone());
        let before = acc.snapshot();

        let err = acc.load_more().await.unwrap_err();
        assert!(matches!(err, BlogError::FetchFailed(FetchError::Status(_))));
        assert!(err.is_retryable());
        assert_eq!(acc.snapshot(), before);
        assert!(acc.has_more());
        assert!(!acc.is_loading());

        acc.load_more().await.unwrap();
        assert_eq!(ids(&acc), vec!["p1", "p2"]);
        assert!(!acc.has_more());
        assert_eq!(
            fetcher.requested(),
            vec![PageToken::new(PAGE2), PageToken::new(PAGE2)]
        );
    }

    #[tokio::test]
    async fn test_page_with_unidentifiable_record_is_rejected_whole() {
        let mut bad = page(&["p2"], Some("https://cms/page3"));
        bad.results.push(RawDocument::default());
        let fetcher = Arc::new(ScriptedFetcher::new().reply(bad));
        let acc = accumulator(seed(&["p1"], Some(PAGE2)), fetcher);
        let before = acc.snapshot();

        let err = acc.load_more().await.unwrap_err();

        assert!(matches!(err, BlogError::FetchFailed(FetchError::Document(_))));
        assert_eq!(acc.snapshot(), before);
    }

    #[tokio::test]
    async fn test_second_load_while_loading_is_ignored() {
        let (fetcher, gate) = ScriptedFetcher::gated();
        let fetcher = Arc::new(fetcher.reply(page(&["p2"], Some("https://cms/page3"))));
        let acc = accumulator(seed(&["p1"], Some(PAGE2)), fetcher.clone());

        let (first, second) = tokio::join!(acc.load_more(), async {
            let outcome = acc.load_more().await;
            gate.notify_one();
            outcome
        });

        assert_eq!(second.unwrap(), LoadOutcome::AlreadyLoading);
        assert!(matches!(first.unwrap(), LoadOutcome::Loaded(_)));
        assert_eq!(fetcher.calls(), 1);
        assert_eq!(acc.double_loads(), 1);
        assert_eq!(ids(&acc), vec!["p1", "p2"]);
    }

    #[tokio::test]
    async fn test_overlapping_pages_are_deduplicated() {
        let fetcher = Arc::new(
            ScriptedFetcher::new()
                .reply(page(&["p2", "p3"], Some("https://cms/page3")))
                .reply(page(&["p3", "p4"], None)),
        );
        let acc = accumulator(seed(&["p1", "p2"], Some(PAGE2)), fetcher);

        let first = acc.load_more().await.unwrap();
        let second = acc.load_more().await.unwrap();

        assert_eq!(first, LoadOutcome::Loaded(MergeStats { added: 1, skipped: 1 }));
        assert_eq!(second, LoadOutcome::Loaded(MergeStats { added: 1, skipped: 1 }));
        assert_eq!(ids(&acc), vec!["p1", "p2", "p3", "p4"]);
    }

    #[tokio::test]
    async fn test_seeded_post_wins_over_refetched_copy() {
        let mut refetched = page(&[], None);
        refetched.results.push(doc("p1", "Edited title"));
        let fetcher = Arc::new(ScriptedFetcher::new().reply(refetched));
        let acc = accumulator(seed(&["p1"], Some(PAGE2)), fetcher);

        acc.load_more().await.unwrap();

        assert_eq!(acc.items()[0].title, "P1");
        assert_eq!(acc.items().len(), 1);
    }

    #[tokio::test]
    async fn test_dropped_load_returns_to_idle() {
        let (fetcher, gate) = ScriptedFetcher::gated();
        let fetcher = Arc::new(fetcher.reply(page(&["p2"], None)));
        let acc = accumulator(seed(&["p1"], Some(PAGE2)), fetcher.clone());

        {
            let mut pending = tokio_test::task::spawn(acc.load_more());
            tokio_test::assert_pending!(pending.poll());
            assert!(acc.is_loading());
        }

        assert!(!acc.is_loading());
        assert_eq!(ids(&acc), vec!["p1"]);
        assert!(acc.has_more());

        gate.notify_one();
        acc.load_more().await.unwrap();
        assert_eq!(ids(&acc), vec!["p1", "p2"]);
        assert_eq!(fetcher.calls(), 2);
    }

    #[tokio::test]
    async fn test_poisoned_lock_keeps_consistent_state() {
        let fetcher = Arc::new(ScriptedFetcher::new().reply(page(&["p2"], None)));
        let acc = accumulator(seed(&["p1"], Some(PAGE2)), fetcher);
        let before = acc.snapshot();

        let panicked = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _held = lock(&acc.inner);
            panic!("render failed");
        }));
        assert!(panicked.is_err());
        assert!(acc.inner.is_poisoned());

        assert_eq!(acc.snapshot(), before);
        assert!(!acc.is_loading());
        acc.load_more().await.unwrap();
        assert_eq!(ids(&acc), vec!["p1", "p2"]);
    }
}
