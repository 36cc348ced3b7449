//! List accumulation state machine
//!
//! A [`ListState`] is the client-side running concatenation of every page
//! fetched for the current filter. It never performs I/O itself: operations
//! that need a fetch hand back a [`PageRequest`] for the owner to dispatch,
//! and the owner reports the outcome through [`ListState::page_fetched`] or
//! [`ListState::fetch_failed`].

use crate::error::FetchError;
use crate::paging::envelope::PageEnvelope;

/// Domain records with a stable identity.
pub trait Identified {
    type Key: PartialEq;

    fn key(&self) -> Self::Key;
}

/// Lifecycle phase of a [`ListState`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    /// Nothing requested yet
    Empty,
    /// First page in flight
    Loading,
    /// A page after the first is in flight
    LoadingMore { page: u32 },
    /// Idle with more pages available
    Loaded,
    /// Idle, last page received
    Complete,
    /// The fetch for `page` failed
    Error { page: u32, message: String },
}

impl Phase {
    pub fn is_loading(&self) -> bool {
        matches!(self, Phase::Loading | Phase::LoadingMore { .. })
    }
}

/// A fetch the owner of a [`ListState`] must dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest<F> {
    pub page: u32,
    pub size: u32,
    pub filter: Option<F>,
    /// Snapshot the request belongs to; results for older generations are stale.
    pub generation: u64,
}

impl<F> PageRequest<F> {
    /// Whether `envelope` answers with an earlier page than this request asked for.
    pub fn is_stalled_by<T>(&self, envelope: &PageEnvelope<T>) -> bool {
        envelope.page_number < self.page
    }
}

/// Outcome of reporting a fetch result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Applied,
    /// Stale generation, or no fetch in flight
    Ignored,
}

/// Accumulated list state for one screen.
#[derive(Debug, Clone)]
pub struct ListState<T, F> {
    accumulated: Vec<T>,
    current_page: u32,
    can_load_more: bool,
    filter: Option<F>,
    page_size: u32,
    phase: Phase,
    generation: u64,
    total_items: u64,
}

impl<T, F: Clone> ListState<T, F> {
    pub fn new(page_size: u32) -> Self {
        Self::with_filter(page_size, None)
    }

    pub fn with_filter(page_size: u32, filter: Option<F>) -> Self {
        Self {
            accumulated: Vec::new(),
            current_page: 0,
            can_load_more: false,
            filter,
            page_size: page_size.max(1),
            phase: Phase::Empty,
            generation: 0,
            total_items: 0,
        }
    }

    pub fn items(&self) -> &[T] {
        &self.accumulated
    }

    pub fn len(&self) -> usize {
        self.accumulated.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accumulated.is_empty()
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn can_load_more(&self) -> bool {
        self.can_load_more
    }

    pub fn filter(&self) -> Option<&F> {
        self.filter.as_ref()
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase.is_loading()
    }

    /// Total reported by the server with the last applied page.
    pub fn total_items(&self) -> u64 {
        self.total_items
    }

    /// Message of the last failed fetch, if the list is in the error phase.
    pub fn error(&self) -> Option<&str> {
        match &self.phase {
            Phase::Error { message, .. } => Some(message),
            _ => None,
        }
    }

    pub fn into_items(self) -> Vec<T> {
        self.accumulated
    }

    /// Discard everything and request page 0.
    ///
    /// Returns `None` while a fetch is in flight.
    pub fn start_initial_load(&mut self) -> Option<PageRequest<F>> {
        if self.phase.is_loading() {
            return None;
        }
        Some(self.reset_and_load())
    }

    /// Request the page after `current_page`.
    ///
    /// Returns `None` unless the list is idle in [`Phase::Loaded`] with more
    /// pages available.
    pub fn load_next_page(&mut self) -> Option<PageRequest<F>> {
        if self.phase != Phase::Loaded || !self.can_load_more {
            return None;
        }
        let page = self.current_page + 1;
        self.phase = Phase::LoadingMore { page };
        Some(self.request(page))
    }

    /// Replace the filter and reload from page 0.
    ///
    /// A fetch already in flight is superseded: its result is ignored when it
    /// arrives.
    pub fn change_filter(&mut self, filter: Option<F>) -> PageRequest<F> {
        self.filter = filter;
        self.reset_and_load()
    }

    /// Re-issue the page whose fetch failed.
    pub fn retry(&mut self) -> Option<PageRequest<F>> {
        let Phase::Error { page, .. } = self.phase else {
            return None;
        };
        if page == 0 || self.accumulated.is_empty() {
            Some(self.reset_and_load())
        } else {
            self.phase = Phase::LoadingMore { page };
            Some(self.request(page))
        }
    }

    /// Append a fetched page.
    ///
    /// A page numbered below the one requested repeats data already held:
    /// its items are dropped and the list is marked complete.
    pub fn page_fetched(&mut self, request: &PageRequest<F>, envelope: PageEnvelope<T>) -> Applied {
        if !self.accepts(request) {
            return Applied::Ignored;
        }
        if request.is_stalled_by(&envelope) {
            self.can_load_more = false;
            self.phase = Phase::Complete;
            return Applied::Applied;
        }
        let is_last = envelope.is_last();
        self.accumulated.extend(envelope.items);
        self.current_page = envelope.page_number;
        self.total_items = envelope.total_items;
        self.can_load_more = !is_last;
        self.phase = if is_last {
            Phase::Complete
        } else {
            Phase::Loaded
        };
        Applied::Applied
    }

    /// Record a failed fetch, keeping the items loaded so far.
    pub fn fetch_failed(&mut self, request: &PageRequest<F>, error: &FetchError) -> Applied {
        if !self.accepts(request) {
            return Applied::Ignored;
        }
        self.phase = Phase::Error {
            page: request.page,
            message: error.to_string(),
        };
        Applied::Applied
    }

    fn accepts(&self, request: &PageRequest<F>) -> bool {
        self.phase.is_loading() && request.generation == self.generation
    }

    fn reset_and_load(&mut self) -> PageRequest<F> {
        self.generation += 1;
        self.accumulated.clear();
        self.current_page = 0;
        self.can_load_more = false;
        self.total_items = 0;
        self.phase = Phase::Loading;
        self.request(0)
    }

    fn request(&self, page: u32) -> PageRequest<F> {
        PageRequest {
            page,
            size: self.page_size,
            filter: self.filter.clone(),
            generation: self.generation,
        }
    }
}

impl<T: Identified, F> ListState<T, F> {
    /// Replace the item with the same key in place.
    ///
    /// An unknown item is appended only once the list is complete; before
    /// that it will arrive with a later page. Returns whether the list changed.
    pub fn upsert(&mut self, item: T) -> bool {
        let key = item.key();
        if let Some(slot) = self.accumulated.iter_mut().find(|i| i.key() == key) {
            *slot = item;
            true
        } else if self.phase == Phase::Complete {
            self.accumulated.push(item);
            true
        } else {
            false
        }
    }

    /// Drop the item with `key`, returning it if present.
    pub fn remove(&mut self, key: &T::Key) -> Option<T> {
        let index = self.accumulated.iter().position(|i| &i.key() == key)?;
        Some(self.accumulated.remove(index))
    }
}
