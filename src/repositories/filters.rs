//! Server-side filter criteria
//!
//! Every set field becomes a query parameter. The client never filters
//! accumulated items itself.

use serde::{Deserialize, Serialize};

use crate::models::OrderStatus;

/// Filters that can be expressed as query parameters.
pub trait QueryFilter {
    fn query_pairs(&self) -> Vec<(String, String)>;
}

/// Lists without a filter.
impl QueryFilter for () {
    fn query_pairs(&self) -> Vec<(String, String)> {
        Vec::new()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
}

impl OrderFilter {
    pub fn status(status: OrderStatus) -> Self {
        Self {
            status: Some(status),
        }
    }
}

impl QueryFilter for OrderFilter {
    fn query_pairs(&self) -> Vec<(String, String)> {
        self.status
            .iter()
            .map(|status| ("status".to_string(), status.as_str().to_string()))
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductFilter {
    pub category_id: Option<i64>,
    pub search: Option<String>,
}

impl QueryFilter for ProductFilter {
    fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(category_id) = self.category_id {
            pairs.push(("categoryId".to_string(), category_id.to_string()));
        }
        if let Some(search) = non_blank(&self.search) {
            pairs.push(("search".to_string(), search.to_string()));
        }
        pairs
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryFilter {
    pub search: Option<String>,
}

impl QueryFilter for CategoryFilter {
    fn query_pairs(&self) -> Vec<(String, String)> {
        non_blank(&self.search)
            .map(|search| vec![("search".to_string(), search.to_string())])
            .unwrap_or_default()
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_filter_pairs() {
        assert!(OrderFilter::default().query_pairs().is_empty());
        assert_eq!(
            OrderFilter::status(OrderStatus::Pending).query_pairs(),
            vec![("status".to_string(), "PENDING".to_string())]
        );
    }

    #[test]
    fn test_product_filter_skips_blank_search() {
        let filter = ProductFilter {
            category_id: Some(4),
            search: Some("  ".to_string()),
        };
        assert_eq!(
            filter.query_pairs(),
            vec![("categoryId".to_string(), "4".to_string())]
        );
    }

    #[test]
    fn test_category_filter_trims_search() {
        let filter = CategoryFilter {
            search: Some(" shoes ".to_string()),
        };
        assert_eq!(
            filter.query_pairs(),
            vec![("search".to_string(), "shoes".to_string())]
        );
    }
}
