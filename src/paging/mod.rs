//! Paginated list synchronization
//!
//! - [`envelope`]: decoding of one page from a raw API response
//! - [`accumulator`]: the per-screen list state machine
//! - [`fetcher`]: the contract repositories implement
//! - [`pager`]: the driver tying a list state to a fetcher

pub mod accumulator;
pub mod envelope;
pub mod fetcher;
pub mod pager;

pub use accumulator::{Applied, Identified, ListState, PageRequest, Phase};
pub use envelope::{CollectionKeys, PageEnvelope, PageMeta};
pub use fetcher::PageFetcher;
pub use pager::{Dispatch, Pager};
