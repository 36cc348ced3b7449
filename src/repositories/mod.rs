//! # Repository Layer
//!
//! One repository per listed entity. Each implements
//! [`PageFetcher`](crate::paging::PageFetcher) over the REST API and owns the
//! candidate collection keys for its envelope.

pub mod category;
pub mod filters;
pub mod order;
pub mod product;
pub mod review;

pub use category::CategoryRepository;
pub use filters::{CategoryFilter, OrderFilter, ProductFilter, QueryFilter};
pub use order::{OrderHistoryRepository, OrderRepository};
pub use product::ProductRepository;
pub use review::ReviewRepository;

use serde::de::DeserializeOwned;

use crate::client::ApiClient;
use crate::error::FetchError;
use crate::paging::{CollectionKeys, PageEnvelope, PageRequest};

/// GET one page of `path` and decode its envelope.
pub(crate) async fn fetch_page<T, F>(
    client: &ApiClient,
    path: &str,
    keys: &CollectionKeys,
    request: &PageRequest<F>,
) -> Result<PageEnvelope<T>, FetchError>
where
    T: DeserializeOwned,
    F: QueryFilter,
{
    let mut query = vec![
        ("page".to_string(), request.page.to_string()),
        ("size".to_string(), request.size.to_string()),
    ];
    if let Some(filter) = &request.filter {
        query.extend(filter.query_pairs());
    }

    let body = client.get_json(path, &query).await?;
    Ok(PageEnvelope::decode(&body, keys))
}
