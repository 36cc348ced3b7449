//! Shared helpers for integration tests against a mock storefront API.

use serde_json::{Map, Value, json};
use storefront::AppContext;
use storefront::config::AppConfig;

/// A context pointed at `base_url`, optionally signed in with `token`.
pub fn context_for(base_url: &str, token: Option<&str>) -> AppContext {
    let config = AppConfig {
        api_base_url: base_url.to_string(),
        api_token: token.map(str::to_string),
        request_timeout_ms: 2_000,
        ..AppConfig::default()
    };
    AppContext::new(config).expect("context builds for mock server")
}

/// A HAL page envelope with `items` under `_embedded.<key>`.
pub fn hal_page(key: &str, items: Vec<Value>, number: u32, size: u32, total_elements: u64) -> Value {
    let total_pages = total_elements.div_ceil(u64::from(size.max(1)));
    let mut embedded = Map::new();
    embedded.insert(key.to_string(), Value::Array(items));
    json!({
        "_embedded": embedded,
        "page": {
            "size": size,
            "totalElements": total_elements,
            "totalPages": total_pages,
            "number": number
        }
    })
}

#[allow(dead_code)]
pub fn order_json(id: i64, status: &str) -> Value {
    json!({
        "id": id,
        "customerId": 7,
        "status": status,
        "total": 19.99,
        "lines": []
    })
}

#[allow(dead_code)]
pub fn product_json(id: i64) -> Value {
    json!({
        "id": id,
        "name": format!("Product {}", id),
        "price": 4.5,
        "categoryId": 3
    })
}
