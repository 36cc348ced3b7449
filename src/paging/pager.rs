//! List pager
//!
//! Drives one [`ListState`] with one [`PageFetcher`] on behalf of a screen.
//! The pager is confined to its owning task: state sits in a `RefCell`
//! whose borrows never span an `.await`, so overlapping calls on the same
//! pager see the in-flight guard instead of issuing a second request.

use std::cell::{Ref, RefCell};

use metrics::counter;
use tracing::{debug, info, warn};

use crate::error::FetchError;
use crate::paging::{Applied, ListState, PageFetcher, PageRequest};

/// What a pager call did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// No fetch was issued (one is in flight, or nothing left to load)
    Skipped,
    /// A page was fetched and appended
    Applied,
    /// A page was fetched but the list moved on in the meantime
    Stale,
    /// The fetch failed; the message is recorded in the list state
    Failed(FetchError),
}

pub struct Pager<P: PageFetcher> {
    fetcher: P,
    state: RefCell<ListState<P::Item, P::Filter>>,
}

impl<P: PageFetcher> Pager<P> {
    pub fn new(fetcher: P, page_size: u32) -> Self {
        Self::with_filter(fetcher, page_size, None)
    }

    pub fn with_filter(fetcher: P, page_size: u32, filter: Option<P::Filter>) -> Self {
        Self {
            fetcher,
            state: RefCell::new(ListState::with_filter(page_size, filter)),
        }
    }

    /// Borrow the current list state.
    ///
    /// Drop the guard before awaiting another pager call.
    pub fn state(&self) -> Ref<'_, ListState<P::Item, P::Filter>> {
        self.state.borrow()
    }

    pub fn fetcher(&self) -> &P {
        &self.fetcher
    }

    pub fn into_state(self) -> ListState<P::Item, P::Filter> {
        self.state.into_inner()
    }

    /// Discard loaded items and fetch page 0.
    pub async fn refresh(&self) -> Dispatch {
        let request = self.state.borrow_mut().start_initial_load();
        self.dispatch(request).await
    }

    /// Fetch the next page if there is one and nothing is in flight.
    pub async fn load_more(&self) -> Dispatch {
        let request = self.state.borrow_mut().load_next_page();
        self.dispatch(request).await
    }

    /// Switch filter and reload from page 0.
    pub async fn set_filter(&self, filter: Option<P::Filter>) -> Dispatch {
        let request = self.state.borrow_mut().change_filter(filter);
        self.dispatch(Some(request)).await
    }

    /// Re-issue the page whose fetch failed.
    pub async fn retry(&self) -> Dispatch {
        let request = self.state.borrow_mut().retry();
        self.dispatch(request).await
    }

    /// Refresh, then keep loading until the list is complete.
    ///
    /// Stops at the first failure, or once `page_limit` pages have been
    /// applied. Returns the number of accumulated items.
    pub async fn load_all(&self, page_limit: Option<u32>) -> Result<usize, FetchError> {
        let mut outcome = self.refresh().await;
        let mut pages = 0u32;
        loop {
            match outcome {
                Dispatch::Failed(error) => return Err(error),
                Dispatch::Applied => pages += 1,
                Dispatch::Skipped => break,
                Dispatch::Stale => {}
            }
            if page_limit.is_some_and(|limit| pages >= limit) {
                break;
            }
            outcome = self.load_more().await;
        }
        Ok(self.state.borrow().len())
    }

    async fn dispatch(&self, request: Option<PageRequest<P::Filter>>) -> Dispatch {
        let Some(request) = request else {
            debug!("Fetch already in flight or nothing left to load; skipping");
            return Dispatch::Skipped;
        };

        debug!(
            page = request.page,
            size = request.size,
            generation = request.generation,
            "Fetching page"
        );
        let outcome = self.fetcher.fetch(&request).await;

        let mut state = self.state.borrow_mut();
        match outcome {
            Ok(envelope) => {
                counter!("pages_fetched_total").increment(1);
                let received = envelope.len();
                let last = envelope.is_last();
                let stalled = request.is_stalled_by(&envelope);
                let served = envelope.page_number;
                match state.page_fetched(&request, envelope) {
                    Applied::Applied if stalled => {
                        warn!(
                            page = request.page,
                            served,
                            "Server repeated an earlier page; treating list as complete"
                        );
                        Dispatch::Applied
                    }
                    Applied::Applied => {
                        info!(
                            page = request.page,
                            received,
                            accumulated = state.len(),
                            last,
                            "Page applied"
                        );
                        Dispatch::Applied
                    }
                    Applied::Ignored => {
                        counter!("stale_pages_dropped_total").increment(1);
                        debug!(page = request.page, "Dropping stale page");
                        Dispatch::Stale
                    }
                }
            }
            Err(error) => {
                counter!("page_fetch_failures_total", "code" => error.code()).increment(1);
                match state.fetch_failed(&request, &error) {
                    Applied::Applied => {
                        warn!(page = request.page, %error, "Page fetch failed");
                        Dispatch::Failed(error)
                    }
                    Applied::Ignored => {
                        debug!(page = request.page, %error, "Ignoring failure of stale fetch");
                        Dispatch::Stale
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paging::{PageEnvelope, Phase};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Serves `total` sequential integers, optionally failing once.
    struct Numbers {
        total: u32,
        calls: AtomicUsize,
        fail_on_call: Option<usize>,
        seen_filters: Mutex<Vec<Option<String>>>,
    }

    impl Numbers {
        fn new(total: u32) -> Self {
            Self {
                total,
                calls: AtomicUsize::new(0),
                fail_on_call: None,
                seen_filters: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl PageFetcher for Numbers {
        type Item = u32;
        type Filter = String;

        async fn fetch(
            &self,
            request: &PageRequest<String>,
        ) -> Result<PageEnvelope<u32>, FetchError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen_filters
                .lock()
                .unwrap()
                .push(request.filter.clone());
            tokio::task::yield_now().await;
            if self.fail_on_call == Some(call) {
                return Err(FetchError::Network {
                    details: "timed out".to_string(),
                });
            }
            let start = request.page * request.size;
            let end = (start + request.size).min(self.total);
            Ok(PageEnvelope {
                items: (start..end).collect(),
                page_number: request.page,
                page_size: request.size,
                total_pages: self.total.div_ceil(request.size),
                total_items: self.total as u64,
            })
        }
    }

    #[tokio::test]
    async fn test_load_all_accumulates_every_page() {
        let pager = Pager::new(Numbers::new(17), 15);
        let total = pager.load_all(None).await.unwrap();

        assert_eq!(total, 17);
        assert_eq!(pager.fetcher().calls.load(Ordering::SeqCst), 2);
        let state = pager.state();
        assert_eq!(state.items(), (0..17).collect::<Vec<_>>().as_slice());
        assert_eq!(state.phase(), &Phase::Complete);
    }

    /// Ignores the requested page and always answers with page 0.
    struct FirstPageOnly;

    #[async_trait]
    impl PageFetcher for FirstPageOnly {
        type Item = u32;
        type Filter = String;

        async fn fetch(
            &self,
            _request: &PageRequest<String>,
        ) -> Result<PageEnvelope<u32>, FetchError> {
            Ok(PageEnvelope {
                items: vec![1, 2],
                page_number: 0,
                page_size: 2,
                total_pages: 2,
                total_items: 4,
            })
        }
    }

    #[tokio::test]
    async fn test_load_all_stops_when_server_repeats_a_page() {
        let pager = Pager::new(FirstPageOnly, 2);
        let loaded = tokio::time::timeout(
            std::time::Duration::from_millis(500),
            pager.load_all(None),
        )
        .await
        .expect("load_all terminates")
        .unwrap();

        assert_eq!(loaded, 2);
        let state = pager.state();
        assert_eq!(state.items(), [1, 2].as_slice());
        assert_eq!(state.phase(), &Phase::Complete);
        assert!(!state.can_load_more());
    }

    #[tokio::test]
    async fn test_load_all_honours_page_limit() {
        let pager = Pager::new(Numbers::new(100), 10);
        let total = pager.load_all(Some(3)).await.unwrap();

        assert_eq!(total, 30);
        assert!(pager.state().can_load_more());
    }

    #[tokio::test]
    async fn test_overlapping_load_more_dispatches_one_fetch() {
        let pager = Pager::new(Numbers::new(40), 10);
        assert_eq!(pager.refresh().await, Dispatch::Applied);

        let (first, second) = tokio::join!(pager.load_more(), pager.load_more());

        assert_eq!(first, Dispatch::Applied);
        assert_eq!(second, Dispatch::Skipped);
        assert_eq!(pager.fetcher().calls.load(Ordering::SeqCst), 2);
        assert_eq!(pager.state().len(), 20);
    }

    #[tokio::test]
    async fn test_filter_change_during_fetch_drops_stale_page() {
        let pager = Pager::new(Numbers::new(40), 10);
        pager.refresh().await;

        let (stale, fresh) = tokio::join!(
            pager.load_more(),
            pager.set_filter(Some("PENDING".to_string()))
        );

        assert_eq!(stale, Dispatch::Stale);
        assert_eq!(fresh, Dispatch::Applied);
        let state = pager.state();
        assert_eq!(state.items(), (0..10).collect::<Vec<_>>().as_slice());
        assert_eq!(state.filter().map(String::as_str), Some("PENDING"));
        let filters = pager.fetcher().seen_filters.lock().unwrap().clone();
        assert_eq!(filters.last(), Some(&Some("PENDING".to_string())));
    }

    #[tokio::test]
    async fn test_failure_is_recorded_and_retry_recovers() {
        let mut numbers = Numbers::new(17);
        numbers.fail_on_call = Some(1);
        let pager = Pager::new(numbers, 15);

        let error = pager.load_all(None).await.unwrap_err();
        assert!(error.is_retryable());
        {
            let state = pager.state();
            assert_eq!(state.len(), 15);
            assert_eq!(state.error(), Some("Network error: timed out"));
        }

        assert_eq!(pager.retry().await, Dispatch::Applied);
        assert_eq!(pager.state().len(), 17);
        assert_eq!(pager.load_more().await, Dispatch::Skipped);
    }
}
