//! Page fetcher contract
//!
//! The sole boundary between list state and the HTTP repositories.

use async_trait::async_trait;

use crate::error::FetchError;
use crate::paging::{PageEnvelope, PageRequest};

#[async_trait]
pub trait PageFetcher: Send + Sync {
    type Item: Send;
    type Filter: Clone + Send + Sync;

    /// Fetch `request.page` of `request.size` items matching `request.filter`.
    async fn fetch(
        &self,
        request: &PageRequest<Self::Filter>,
    ) -> Result<PageEnvelope<Self::Item>, FetchError>;
}
