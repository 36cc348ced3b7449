//! # Category Repository

use std::sync::Arc;

use async_trait::async_trait;

use crate::client::ApiClient;
use crate::error::FetchError;
use crate::models::Category;
use crate::paging::{CollectionKeys, PageEnvelope, PageFetcher, PageRequest};
use crate::repositories::{CategoryFilter, fetch_page};

#[derive(Debug, Clone)]
pub struct CategoryRepository {
    client: Arc<ApiClient>,
    keys: CollectionKeys,
}

impl CategoryRepository {
    pub fn new(client: Arc<ApiClient>, keys: CollectionKeys) -> Self {
        Self { client, keys }
    }
}

#[async_trait]
impl PageFetcher for CategoryRepository {
    type Item = Category;
    type Filter = CategoryFilter;

    async fn fetch(
        &self,
        request: &PageRequest<CategoryFilter>,
    ) -> Result<PageEnvelope<Category>, FetchError> {
        fetch_page(&self.client, "categories", &self.keys, request).await
    }
}
