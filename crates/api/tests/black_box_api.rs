use std::sync::Arc;

use chrono::DateTime;
use reqwest::StatusCode;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::Value;

use pricing_api::app::services::AppServices;
use pricing_core::ProductKey;
use pricing_infra::cache::InMemoryResultCache;
use pricing_infra::record_store::InMemoryRecordStore;
use pricing_prices::{ArticleMetadata, ArticleWithPrices, PriceRecord, ResolutionPolicy};

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn(policy: ResolutionPolicy) -> Self {
        // Same router as prod, seeded store, ephemeral port.
        let services = AppServices::in_memory(
            Arc::new(seeded_store()),
            Arc::new(InMemoryResultCache::new()),
            policy,
        );
        let app = pricing_api::app::build_app(Arc::new(services));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn record(subtype: &str, currency: &str, amount: Decimal, from: &str, to: &str) -> PriceRecord {
    PriceRecord::new(
        "retail",
        subtype,
        currency,
        amount,
        DateTime::parse_from_rfc3339(from).unwrap(),
        DateTime::parse_from_rfc3339(to).unwrap(),
    )
    .unwrap()
}

fn seeded_store() -> InMemoryRecordStore {
    let store = InMemoryRecordStore::new();

    // Overlapping, disagreeing amounts.
    store.upsert(
        ProductKey::parse("7001", "1000102674").unwrap(),
        ArticleWithPrices {
            metadata: ArticleMetadata {
                uom: Some("EA".to_string()),
                description: Some("Cordless drill".to_string()),
                brand: Some("ACME".to_string()),
                model: Some("D-18".to_string()),
            },
            records: vec![
                record("regular", "CAD", dec!(30.00), "2023-01-01T00:00:00Z", "2023-01-31T23:59:59Z"),
                record("discounted", "CAD", dec!(25.00), "2023-01-15T00:00:00Z", "2023-02-15T23:59:59Z"),
            ],
        },
    );

    // Overlapping, equal amounts.
    store.upsert(
        ProductKey::parse("7001", "1000102675").unwrap(),
        ArticleWithPrices {
            metadata: ArticleMetadata::default(),
            records: vec![
                record("regular", "CAD", dec!(30.00), "2023-01-01T00:00:00Z", "2023-01-31T23:59:59Z"),
                record("regular", "CAD", dec!(30.00), "2023-01-15T00:00:00Z", "2023-02-15T23:59:59Z"),
            ],
        },
    );

    // Known article, no prices.
    store.upsert(
        ProductKey::parse("7001", "1000102676").unwrap(),
        ArticleWithPrices {
            metadata: ArticleMetadata::default(),
            records: vec![],
        },
    );

    // Mixed currencies in one group.
    store.upsert(
        ProductKey::parse("7001", "1000102677").unwrap(),
        ArticleWithPrices {
            metadata: ArticleMetadata::default(),
            records: vec![
                record("regular", "CAD", dec!(30.00), "2023-01-01T00:00:00Z", "2023-01-31T23:59:59Z"),
                record("regular", "USD", dec!(30.00), "2023-01-15T00:00:00Z", "2023-02-15T23:59:59Z"),
            ],
        },
    );

    store
}

fn instant(v: &Value) -> DateTime<chrono::FixedOffset> {
    DateTime::parse_from_rfc3339(v.as_str().expect("instant must be a string")).unwrap()
}

#[tokio::test]
async fn health_reports_backend_and_policy() {
    let server = TestServer::spawn(ResolutionPolicy::Lenient).await;

    let res = reqwest::get(server.url("/health")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["backend"], "in_memory");
    assert_eq!(body["policy"], "lenient");
}

#[tokio::test]
async fn conflicting_prices_come_back_flagged_in_the_envelope() {
    let server = TestServer::spawn(ResolutionPolicy::Lenient).await;

    let res = reqwest::get(server.url("/pricing/v1/prices/7001/1000102674?page=2&size=5"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().get("x-request-id").is_some());

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["store"], "7001");
    assert_eq!(body["article"], "1000102674");
    assert_eq!(body["meta"], serde_json::json!({ "page": 2, "size": 5 }));
    assert_eq!(body["properties"]["brand"], "ACME");
    assert_eq!(body["properties"]["description"], "Cordless drill");
    assert!(body["generated_date"].is_string());

    let prices = body["prices"].as_array().unwrap();
    assert_eq!(prices.len(), 2);
    assert!(prices.iter().all(|p| p["overlapped"] == true));

    let amounts: Vec<&str> = prices.iter().map(|p| p["amount"].as_str().unwrap()).collect();
    assert!(amounts.contains(&"30.00"));
    assert!(amounts.contains(&"25.00"));
}

#[tokio::test]
async fn equal_overlapping_prices_are_merged() {
    let server = TestServer::spawn(ResolutionPolicy::Lenient).await;

    let res = reqwest::get(server.url("/pricing/v1/prices/7001/1000102675"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["meta"], serde_json::json!({ "page": 1, "size": 3 }));

    let prices = body["prices"].as_array().unwrap();
    assert_eq!(prices.len(), 1);
    let merged = &prices[0];
    assert_eq!(merged["type"], "retail");
    assert_eq!(merged["subtype"], "regular");
    assert_eq!(merged["currency"], "CAD");
    assert_eq!(merged["overlapped"], false);
    assert_eq!(
        instant(&merged["validFrom"]),
        DateTime::parse_from_rfc3339("2023-01-01T00:00:00Z").unwrap()
    );
    assert_eq!(
        instant(&merged["validTo"]),
        DateTime::parse_from_rfc3339("2023-02-15T23:59:59Z").unwrap()
    );
}

#[tokio::test]
async fn missing_prices_return_problem_body() {
    let server = TestServer::spawn(ResolutionPolicy::Lenient).await;
    let client = reqwest::Client::new();

    for path in [
        "/pricing/v1/prices/7001/1000102676",
        "/pricing/v1/prices/9999/1000102674",
    ] {
        let res = client.get(server.url(path)).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND, "{path}");

        let body: Value = res.json().await.unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "type": "Not_Found",
                "title": "Unavailable prices",
                "status": 404,
                "detail": "No prices were found",
            })
        );
    }
}

#[tokio::test]
async fn non_integer_page_is_a_bad_request() {
    let server = TestServer::spawn(ResolutionPolicy::Lenient).await;

    let res = reqwest::get(server.url("/pricing/v1/prices/7001/1000102674?page=abc"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["type"], "Bad_Request");
    assert_eq!(body["status"], 400);
}

#[tokio::test]
async fn blank_store_id_is_a_bad_request() {
    let server = TestServer::spawn(ResolutionPolicy::Lenient).await;

    let res = reqwest::get(server.url("/pricing/v1/prices/%20/1000102674"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn supplied_request_id_is_echoed() {
    let server = TestServer::spawn(ResolutionPolicy::Lenient).await;

    let res = reqwest::Client::new()
        .get(server.url("/health"))
        .header("x-request-id", "req-42")
        .send()
        .await
        .unwrap();

    assert_eq!(res.headers()["x-request-id"], "req-42");
}

#[tokio::test]
async fn strict_policy_rejects_mixed_currency_with_internal_error() {
    let server = TestServer::spawn(ResolutionPolicy::Strict).await;

    let res = reqwest::get(server.url("/pricing/v1/prices/7001/1000102677"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["type"], "Internal_Error");
    assert_eq!(body["status"], 500);
}

#[tokio::test]
async fn lenient_policy_merges_mixed_currency_by_amount_only() {
    let server = TestServer::spawn(ResolutionPolicy::Lenient).await;

    let res = reqwest::get(server.url("/pricing/v1/prices/7001/1000102677"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = res.json().await.unwrap();
    let prices = body["prices"].as_array().unwrap();
    assert_eq!(prices.len(), 1);
    // Fields come from the first collected record, not the anchor.
    assert_eq!(prices[0]["currency"], "USD");
    assert_eq!(prices[0]["overlapped"], false);
}

#[tokio::test]
async fn oversized_request_id_is_replaced_with_a_fresh_one() {
    let server = TestServer::spawn(ResolutionPolicy::Lenient).await;
    let too_long = "r".repeat(pricing_api::middleware::MAX_REQUEST_ID_LEN + 1);

    let res = reqwest::Client::new()
        .get(server.url("/health"))
        .header("x-request-id", too_long.as_str())
        .send()
        .await
        .unwrap();

    let echoed = res.headers()["x-request-id"].to_str().unwrap();
    assert_ne!(echoed, too_long);
    assert!(uuid::Uuid::parse_str(echoed).is_ok());
}

#[tokio::test]
async fn request_id_at_the_length_limit_is_kept() {
    let server = TestServer::spawn(ResolutionPolicy::Lenient).await;
    let at_limit = "r".repeat(pricing_api::middleware::MAX_REQUEST_ID_LEN);

    let res = reqwest::Client::new()
        .get(server.url("/health"))
        .header("x-request-id", at_limit.as_str())
        .send()
        .await
        .unwrap();

    assert_eq!(res.headers()["x-request-id"].to_str().unwrap(), at_limit);
}
