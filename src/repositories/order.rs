//! # Order Repositories
//!
//! The admin order board lists every order; a customer's order history
//! lists only theirs. Both share the order envelope keys.

use std::sync::Arc;

use async_trait::async_trait;

use crate::client::ApiClient;
use crate::error::FetchError;
use crate::models::Order;
use crate::paging::{CollectionKeys, PageEnvelope, PageFetcher, PageRequest};
use crate::repositories::{OrderFilter, fetch_page};

/// All orders, optionally by status.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    client: Arc<ApiClient>,
    keys: CollectionKeys,
}

impl OrderRepository {
    pub fn new(client: Arc<ApiClient>, keys: CollectionKeys) -> Self {
        Self { client, keys }
    }
}

#[async_trait]
impl PageFetcher for OrderRepository {
    type Item = Order;
    type Filter = OrderFilter;

    async fn fetch(
        &self,
        request: &PageRequest<OrderFilter>,
    ) -> Result<PageEnvelope<Order>, FetchError> {
        fetch_page(&self.client, "orders", &self.keys, request).await
    }
}

/// Orders placed by one customer.
#[derive(Debug, Clone)]
pub struct OrderHistoryRepository {
    client: Arc<ApiClient>,
    keys: CollectionKeys,
    customer_id: i64,
}

impl OrderHistoryRepository {
    pub fn new(client: Arc<ApiClient>, keys: CollectionKeys, customer_id: i64) -> Self {
        Self {
            client,
            keys,
            customer_id,
        }
    }

    pub fn customer_id(&self) -> i64 {
        self.customer_id
    }
}

#[async_trait]
impl PageFetcher for OrderHistoryRepository {
    type Item = Order;
    type Filter = OrderFilter;

    async fn fetch(
        &self,
        request: &PageRequest<OrderFilter>,
    ) -> Result<PageEnvelope<Order>, FetchError> {
        let path = format!("customers/{}/orders", self.customer_id);
        fetch_page(&self.client, &path, &self.keys, request).await
    }
}
