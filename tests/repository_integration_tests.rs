use serde_json::json;
use storefront::FetchError;
use storefront::models::OrderStatus;
use storefront::paging::{PageFetcher, PageRequest};
use storefront::repositories::{CategoryFilter, OrderFilter, ProductFilter};
use storefront::telemetry::{self, TraceContext};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header, method, path, query_param},
};
mod test_utils;
use test_utils::{context_for, hal_page, order_json, product_json};

fn request<F>(page: u32, size: u32, filter: Option<F>) -> PageRequest<F> {
    PageRequest {
        page,
        size,
        filter,
        generation: 1,
    }
}

#[tokio::test]
async fn test_orders_send_paging_and_status_filter() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/orders"))
        .and(query_param("page", "1"))
        .and(query_param("size", "15"))
        .and(query_param("status", "SHIPPED"))
        .and(header("authorization", "Bearer admin-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(hal_page(
            "orders",
            vec![order_json(16, "SHIPPED"), order_json(17, "SHIPPED")],
            1,
            15,
            17,
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let context = context_for(&mock_server.uri(), Some("admin-token"));
    let envelope = context
        .orders()
        .fetch(&request(1, 15, Some(OrderFilter::status(OrderStatus::Shipped))))
        .await
        .unwrap();

    assert_eq!(envelope.len(), 2);
    assert_eq!(envelope.page_number, 1);
    assert_eq!(envelope.total_pages, 2);
    assert_eq!(envelope.total_items, 17);
    assert!(envelope.is_last());
    assert_eq!(envelope.items[0].id, 16);
    assert_eq!(envelope.items[0].status, OrderStatus::Shipped);
}

#[tokio::test]
async fn test_signed_out_session_sends_no_authorization() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(hal_page(
            "products",
            vec![product_json(1)],
            0,
            15,
            1,
        )))
        .mount(&mock_server)
        .await;

    let context = context_for(&mock_server.uri(), None);
    let envelope = context
        .products()
        .fetch(&request::<ProductFilter>(0, 15, None))
        .await
        .unwrap();
    assert_eq!(envelope.len(), 1);

    let received = mock_server.received_requests().await.unwrap();
    assert_eq!(received.len(), 1);
    assert!(received[0].headers.get("authorization").is_none());
    assert!(received[0].headers.get("x-request-id").is_some());
    assert!(received[0].headers.get("x-correlation-id").is_none());
}

#[tokio::test]
async fn test_requests_share_trace_id_but_not_request_id() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/products"))
        .and(header("x-correlation-id", "run-42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(hal_page(
            "products",
            vec![product_json(1)],
            0,
            15,
            1,
        )))
        .expect(2)
        .mount(&mock_server)
        .await;

    let context = context_for(&mock_server.uri(), None);
    let products = context.products();
    let trace = TraceContext {
        trace_id: "run-42".to_string(),
    };
    telemetry::with_trace_context(trace, async {
        for _ in 0..2 {
            products
                .fetch(&request::<ProductFilter>(0, 15, None))
                .await
                .unwrap();
        }
    })
    .await;

    let received = mock_server.received_requests().await.unwrap();
    let request_ids: Vec<_> = received
        .iter()
        .map(|r| r.headers.get("x-request-id").cloned())
        .collect();
    assert_eq!(request_ids.len(), 2);
    assert!(request_ids.iter().all(Option::is_some));
    assert_ne!(request_ids[0], request_ids[1]);
}

#[tokio::test]
async fn test_token_set_after_startup_is_used() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/categories"))
        .and(query_param("search", "shoes"))
        .and(header("authorization", "Bearer late-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(hal_page(
            "categories",
            vec![json!({ "id": 3, "name": "Shoes" })],
            0,
            15,
            1,
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let context = context_for(&mock_server.uri(), None);
    context.session().set_token("late-token");

    let filter = CategoryFilter {
        search: Some("shoes".to_string()),
    };
    let envelope = context
        .categories()
        .fetch(&request(0, 15, Some(filter)))
        .await
        .unwrap();
    assert_eq!(envelope.items[0].name, "Shoes");
}

#[tokio::test]
async fn test_product_filter_query_parameters() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/products"))
        .and(query_param("categoryId", "3"))
        .and(query_param("search", "mug"))
        .respond_with(ResponseTemplate::new(200).set_body_json(hal_page(
            "productList",
            vec![product_json(9)],
            0,
            15,
            1,
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let context = context_for(&mock_server.uri(), None);
    let filter = ProductFilter {
        category_id: Some(3),
        search: Some("mug".to_string()),
    };
    let envelope = context
        .products()
        .fetch(&request(0, 15, Some(filter)))
        .await
        .unwrap();
    assert_eq!(envelope.items[0].id, 9);
    assert_eq!(envelope.items[0].category_id, Some(3));
}

#[tokio::test]
async fn test_nested_history_and_review_paths() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/customers/7/orders"))
        .respond_with(ResponseTemplate::new(200).set_body_json(hal_page(
            "orders",
            vec![order_json(1, "DELIVERED")],
            0,
            15,
            1,
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/products/9/reviews"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [{ "id": 4, "productId": 9, "rating": 5, "comment": "Great" }],
            "page": { "size": 15, "totalElements": 1, "totalPages": 1, "number": 0 }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let context = context_for(&mock_server.uri(), Some("customer-token"));

    let history = context
        .order_history(7)
        .fetch(&request::<OrderFilter>(0, 15, None))
        .await
        .unwrap();
    assert_eq!(history.items[0].status, OrderStatus::Delivered);

    let reviews = context
        .reviews(9)
        .fetch(&request::<()>(0, 15, None))
        .await
        .unwrap();
    assert_eq!(reviews.items[0].rating, 5);
    assert_eq!(reviews.items[0].product_id, Some(9));
}

#[tokio::test]
async fn test_unrecognized_collection_field_yields_empty_page() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/orders"))
        .respond_with(ResponseTemplate::new(200).set_body_json(hal_page(
            "somethingElse",
            vec![order_json(1, "PENDING")],
            0,
            15,
            1,
        )))
        .mount(&mock_server)
        .await;

    let context = context_for(&mock_server.uri(), None);
    let envelope = context
        .orders()
        .fetch(&request::<OrderFilter>(0, 15, None))
        .await
        .unwrap();
    assert!(envelope.is_empty());
    assert_eq!(envelope.total_items, 1);
}

#[tokio::test]
async fn test_unauthorized_maps_to_unauthorized() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/orders"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&mock_server)
        .await;

    let context = context_for(&mock_server.uri(), Some("expired"));
    let err = context
        .orders()
        .fetch(&request::<OrderFilter>(0, 15, None))
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Unauthorized { .. }));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_rate_limit_carries_retry_after() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "30"))
        .mount(&mock_server)
        .await;

    let context = context_for(&mock_server.uri(), None);
    let err = context
        .products()
        .fetch(&request::<ProductFilter>(0, 15, None))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        FetchError::RateLimited {
            retry_after_secs: Some(30)
        }
    );
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_server_error_maps_to_http_with_body_snippet() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/categories"))
        .respond_with(ResponseTemplate::new(500).set_body_string("database unavailable"))
        .mount(&mock_server)
        .await;

    let context = context_for(&mock_server.uri(), None);
    let err = context
        .categories()
        .fetch(&request::<CategoryFilter>(0, 15, None))
        .await
        .unwrap_err();
    match err {
        FetchError::Http {
            status,
            body_snippet,
        } => {
            assert_eq!(status, 500);
            assert_eq!(body_snippet.as_deref(), Some("database unavailable"));
        }
        other => panic!("expected Http error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_non_json_body_maps_to_decode() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/orders"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
        .mount(&mock_server)
        .await;

    let context = context_for(&mock_server.uri(), None);
    let err = context
        .orders()
        .fetch(&request::<OrderFilter>(0, 15, None))
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Decode { .. }));
}
