//! Application context
//!
//! Holds the configuration, the session and the shared HTTP client, and
//! builds repositories and pagers for list screens. One context is created
//! at startup and passed to whoever needs it; there is no global instance.

use std::sync::Arc;

use crate::client::{ApiClient, ClientInitError};
use crate::config::AppConfig;
use crate::paging::{PageFetcher, Pager};
use crate::repositories::{
    CategoryRepository, OrderHistoryRepository, OrderRepository, ProductRepository,
    ReviewRepository,
};
use crate::session::Session;

#[derive(Debug, Clone)]
pub struct AppContext {
    config: Arc<AppConfig>,
    client: Arc<ApiClient>,
}

impl AppContext {
    /// Build a context, moving the configured token into the session.
    ///
    /// The stored config no longer carries the token afterwards.
    pub fn new(mut config: AppConfig) -> Result<Self, ClientInitError> {
        let session = match config.api_token.take() {
            Some(token) => Session::with_token(token),
            None => Session::new(),
        };
        Self::with_session(config, Arc::new(session))
    }

    /// Build a context around an existing session.
    pub fn with_session(config: AppConfig, session: Arc<Session>) -> Result<Self, ClientInitError> {
        let client = ApiClient::new(&config, session)?;
        Ok(Self {
            config: Arc::new(config),
            client: Arc::new(client),
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn session(&self) -> &Arc<Session> {
        self.client.session()
    }

    pub fn client(&self) -> &Arc<ApiClient> {
        &self.client
    }

    pub fn orders(&self) -> OrderRepository {
        OrderRepository::new(
            Arc::clone(&self.client),
            self.config.collection_keys.orders.clone(),
        )
    }

    pub fn order_history(&self, customer_id: i64) -> OrderHistoryRepository {
        OrderHistoryRepository::new(
            Arc::clone(&self.client),
            self.config.collection_keys.orders.clone(),
            customer_id,
        )
    }

    pub fn products(&self) -> ProductRepository {
        ProductRepository::new(
            Arc::clone(&self.client),
            self.config.collection_keys.products.clone(),
        )
    }

    pub fn categories(&self) -> CategoryRepository {
        CategoryRepository::new(
            Arc::clone(&self.client),
            self.config.collection_keys.categories.clone(),
        )
    }

    pub fn reviews(&self, product_id: i64) -> ReviewRepository {
        ReviewRepository::new(
            Arc::clone(&self.client),
            self.config.collection_keys.reviews.clone(),
            product_id,
        )
    }

    /// A pager over `fetcher` using the configured page size.
    pub fn pager<P: PageFetcher>(&self, fetcher: P, filter: Option<P::Filter>) -> Pager<P> {
        Pager::with_filter(fetcher, self.config.page_size, filter)
    }
}
