//! # Review Repository

use std::sync::Arc;

use async_trait::async_trait;

use crate::client::ApiClient;
use crate::error::FetchError;
use crate::models::Review;
use crate::paging::{CollectionKeys, PageEnvelope, PageFetcher, PageRequest};
use crate::repositories::fetch_page;

/// Reviews of one product. Not filterable.
#[derive(Debug, Clone)]
pub struct ReviewRepository {
    client: Arc<ApiClient>,
    keys: CollectionKeys,
    product_id: i64,
}

impl ReviewRepository {
    pub fn new(client: Arc<ApiClient>, keys: CollectionKeys, product_id: i64) -> Self {
        Self {
            client,
            keys,
            product_id,
        }
    }

    pub fn product_id(&self) -> i64 {
        self.product_id
    }
}

#[async_trait]
impl PageFetcher for ReviewRepository {
    type Item = Review;
    type Filter = ();

    async fn fetch(&self, request: &PageRequest<()>) -> Result<PageEnvelope<Review>, FetchError> {
        let path = format!("products/{}/reviews", self.product_id);
        fetch_page(&self.client, &path, &self.keys, request).await
    }
}
