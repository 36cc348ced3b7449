//! # Product Repository

use std::sync::Arc;

use async_trait::async_trait;

use crate::client::ApiClient;
use crate::error::FetchError;
use crate::models::Product;
use crate::paging::{CollectionKeys, PageEnvelope, PageFetcher, PageRequest};
use crate::repositories::{ProductFilter, fetch_page};

/// Product catalogue, filterable by category and free-text search.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    client: Arc<ApiClient>,
    keys: CollectionKeys,
}

impl ProductRepository {
    pub fn new(client: Arc<ApiClient>, keys: CollectionKeys) -> Self {
        Self { client, keys }
    }
}

#[async_trait]
impl PageFetcher for ProductRepository {
    type Item = Product;
    type Filter = ProductFilter;

    async fn fetch(
        &self,
        request: &PageRequest<ProductFilter>,
    ) -> Result<PageEnvelope<Product>, FetchError> {
        fetch_page(&self.client, "products", &self.keys, request).await
    }
}
