//! Black-box HTTP tests: the real router on an ephemeral port, driven with
//! reqwest, backed by an in-memory catalog.

use std::time::Duration;

use reqwest::StatusCode;
use serde_json::json;
use tokio_stream::StreamExt;

use bibloteka_api::app::{build_app, services::AppServices};

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        let services = AppServices::open_in_memory()
            .await
            .expect("in-memory services");
        Self::serve(services).await
    }

    /// Variant with an injected gateway, for pointing the external search
    /// proxies at a local fake upstream.
    async fn spawn_with_gateway(gateway: bibloteka_gateway::MetadataGateway) -> Self {
        let catalog = bibloteka_catalog::CatalogStore::open_in_memory()
            .await
            .expect("in-memory store");
        Self::serve(AppServices::with_store(catalog, gateway)).await
    }

    async fn serve(services: AppServices) -> Self {
        let app = build_app(services);
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
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn create_book(client: &reqwest::Client, base: &str, title: &str) -> i64 {
    let res = client
        .post(format!("{base}/api/books"))
        .json(&json!({ "title": title }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    body["id"].as_i64().unwrap()
}

#[tokio::test]
async fn book_creation_requires_a_title() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/api/books", srv.base_url))
        .json(&json!({ "author": "nobody" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn catalog_listing_annotates_and_filters_stock() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let stocked = create_book(&client, &srv.base_url, "Stocked").await;
    let bare = create_book(&client, &srv.base_url, "Bare").await;

    for qty in [3, 4] {
        let res = client
            .post(format!("{}/api/inventory", srv.base_url))
            .json(&json!({ "book_id": stocked, "quantity": qty, "owner_name": "Ben" }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    let books: Vec<serde_json::Value> = client
        .get(format!("{}/api/books?withInventory=1", srv.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let qty_of = |id: i64| {
        books
            .iter()
            .find(|b| b["id"] == json!(id))
            .map(|b| b["stock_qty"].as_i64().unwrap())
            .unwrap()
    };
    assert_eq!(qty_of(stocked), 7);
    assert_eq!(qty_of(bare), 0);

    let in_stock: Vec<serde_json::Value> = client
        .get(format!(
            "{}/api/books?withInventory=1&onlyInStock=1",
            srv.base_url
        ))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(in_stock.len(), 1);
    assert_eq!(in_stock[0]["title"], "Stocked");

    // Without the flag there is no annotation at all.
    let plain: Vec<serde_json::Value> = client
        .get(format!("{}/api/books", srv.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(plain.iter().all(|b| b.get("stock_qty").is_none()));
}

#[tokio::test]
async fn invalid_listing_type_is_rejected_and_not_persisted() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let book = create_book(&client, &srv.base_url, "Typed").await;

    let res = client
        .post(format!("{}/api/listings", srv.base_url))
        .json(&json!({ "type": "lend", "book_id": book }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let diag: serde_json::Value = client
        .get(format!("{}/api/diag", srv.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(diag["db"]["listings"], 0);
}

#[tokio::test]
async fn listings_feed_and_book_scope() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let a = create_book(&client, &srv.base_url, "A").await;
    let b = create_book(&client, &srv.base_url, "B").await;

    for (book, kind) in [(a, "sell"), (b, "buy")] {
        let res = client
            .post(format!("{}/api/listings", srv.base_url))
            .json(&json!({ "type": kind, "book_id": book, "contact_name": "Drita" }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    let feed: Vec<serde_json::Value> = client
        .get(format!("{}/api/listings", srv.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(feed.len(), 2);

    let scoped: Vec<serde_json::Value> = client
        .get(format!("{}/api/listings?book_id={a}", srv.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(scoped.len(), 1);
    assert_eq!(scoped[0]["type"], "sell");
    assert_eq!(scoped[0]["quantity"], 1);
}

#[tokio::test]
async fn availability_orders_supply_priced_first() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let book = create_book(&client, &srv.base_url, "Ordered").await;

    // A: no price; B: price 10, qty 5; C: price 10, qty 2.
    for (name, qty, price) in [("A", 1, None), ("B", 5, Some(10)), ("C", 2, Some(10))] {
        let res = client
            .post(format!("{}/api/inventory", srv.base_url))
            .json(&json!({
                "book_id": book,
                "quantity": qty,
                "price": price,
                "owner_name": name,
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    let view: serde_json::Value = client
        .get(format!("{}/api/availability?book_id={book}", srv.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let names: Vec<&str> = view["supply"]
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["B", "C", "A"]);

    // Missing book_id is the caller's fault.
    let res = client
        .get(format!("{}/api/availability", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn inventory_aggregate_requires_book_id_and_reports_bounds() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/api/inventory/aggregate", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let book = create_book(&client, &srv.base_url, "Priced").await;
    for price in [300, 700] {
        client
            .post(format!("{}/api/inventory", srv.base_url))
            .json(&json!({ "book_id": book, "quantity": 1, "price": price }))
            .send()
            .await
            .unwrap();
    }

    let agg: serde_json::Value = client
        .get(format!(
            "{}/api/inventory/aggregate?book_id={book}",
            srv.base_url
        ))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(agg["qty"], 2);
    assert_eq!(agg["min_price"], 300);
    assert_eq!(agg["max_price"], 700);
}

#[tokio::test]
async fn comments_round_trip_with_validation() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let book = create_book(&client, &srv.base_url, "Discussed").await;

    let res = client
        .post(format!("{}/api/comments", srv.base_url))
        .json(&json!({ "book_id": book }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = client
        .post(format!("{}/api/comments", srv.base_url))
        .json(&json!({ "book_id": book, "user_name": "Mira", "text": "great read" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let comments: Vec<serde_json::Value> = client
        .get(format!("{}/api/comments?book_id={book}", srv.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0]["text"], "great read");

    let res = client
        .get(format!("{}/api/comments", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn deleting_a_book_removes_all_dependents() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let book = create_book(&client, &srv.base_url, "Doomed").await;

    client
        .post(format!("{}/api/inventory", srv.base_url))
        .json(&json!({ "book_id": book, "quantity": 1 }))
        .send()
        .await
        .unwrap();
    client
        .post(format!("{}/api/listings", srv.base_url))
        .json(&json!({ "type": "sell", "book_id": book }))
        .send()
        .await
        .unwrap();
    client
        .post(format!("{}/api/comments", srv.base_url))
        .json(&json!({ "book_id": book, "text": "bye" }))
        .send()
        .await
        .unwrap();

    let res = client
        .delete(format!("{}/api/books/{book}", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let diag: serde_json::Value = client
        .get(format!("{}/api/diag", srv.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(diag["db"]["books"], 0);
    assert_eq!(diag["db"]["inventory"], 0);
    assert_eq!(diag["db"]["listings"], 0);
    assert_eq!(diag["db"]["comments"], 0);
}

#[tokio::test]
async fn diag_reports_version_and_counts() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    create_book(&client, &srv.base_url, "Counted").await;

    let diag: serde_json::Value = client
        .get(format!("{}/api/diag", srv.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(diag["version"].is_string());
    assert_eq!(diag["db"]["books"], 1);
    // Creating the book pushed exactly one notification.
    assert_eq!(diag["db"]["notifications"], 1);
}

#[tokio::test]
async fn health_endpoint_is_open() {
    let srv = TestServer::spawn().await;
    let res = reqwest::get(format!("{}/health", srv.base_url)).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn frontend_is_served() {
    let srv = TestServer::spawn().await;
    let res = reqwest::get(format!("{}/", srv.base_url)).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.text().await.unwrap().contains("Bibloteka"));

    let res = reqwest::get(format!("{}/static/js/app.js", srv.base_url))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

/// Read from an SSE response until `needle` shows up (or the deadline hits).
async fn read_stream_until(response: reqwest::Response, needle: &str) -> String {
    let mut seen = String::new();
    let mut stream = response.bytes_stream();
    let deadline = Duration::from_secs(5);

    loop {
        match tokio::time::timeout(deadline, stream.next()).await {
            Ok(Some(Ok(chunk))) => {
                seen.push_str(&String::from_utf8_lossy(&chunk));
                if seen.contains(needle) {
                    return seen;
                }
            }
            Ok(Some(Err(_))) | Ok(None) => panic!("stream ended before {needle:?}; saw: {seen}"),
            Err(_) => panic!("timed out waiting for {needle:?}; saw: {seen}"),
        }
    }
}

#[tokio::test]
async fn notification_stream_replays_history_on_connect() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    // History exists before anyone connects.
    create_book(&client, &srv.base_url, "Replayed").await;

    let response = client
        .get(format!("{}/api/notifications/stream", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let seen = read_stream_until(response, "Replayed").await;
    assert!(seen.contains("event: tick"));
}

/// Fake metadata upstream: Open Library answers 503, Google Books answers
/// with one well-formed volume.
async fn spawn_fake_upstream() -> String {
    use axum::{routing::get, Json, Router};

    let app = Router::new()
        .route(
            "/search.json",
            get(|| async {
                (axum::http::StatusCode::SERVICE_UNAVAILABLE, "upstream down")
            }),
        )
        .route(
            "/books/v1/volumes",
            get(|| async {
                Json(json!({
                    "items": [{
                        "id": "vol-1",
                        "volumeInfo": { "title": "Chronicle in Stone" }
                    }]
                }))
            }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind fake upstream");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

#[tokio::test]
async fn upstream_bad_status_surfaces_as_502_with_the_code() {
    let upstream = spawn_fake_upstream().await;
    let gateway =
        bibloteka_gateway::MetadataGateway::with_bases(upstream.clone(), upstream);
    let srv = TestServer::spawn_with_gateway(gateway).await;

    let res = reqwest::get(format!(
        "{}/api/ext/openlibrary?query=kadare",
        srv.base_url
    ))
    .await
    .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "upstream_bad_status");
    assert_eq!(body["status"], 503);
}

#[tokio::test]
async fn upstream_success_is_normalized_through_the_proxy() {
    let upstream = spawn_fake_upstream().await;
    let gateway =
        bibloteka_gateway::MetadataGateway::with_bases(upstream.clone(), upstream);
    let srv = TestServer::spawn_with_gateway(gateway).await;

    let hits: Vec<serde_json::Value> = reqwest::get(format!(
        "{}/api/ext/google-books?query=kadare",
        srv.base_url
    ))
    .await
    .unwrap()
    .json()
    .await
    .unwrap();

    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0]["key"], "vol-1");
    assert_eq!(hits[0]["title"], "Chronicle in Stone");
    // Missing fields get placeholders, not nulls.
    assert_eq!(hits[0]["author"], "Unknown author");
    assert_eq!(hits[0]["cover_url"], "");
}

#[tokio::test]
async fn unreachable_upstream_is_an_internal_error() {
    // Nothing listens here; the connection is refused immediately.
    let dead = "http://127.0.0.1:9".to_owned();
    let gateway = bibloteka_gateway::MetadataGateway::with_bases(dead.clone(), dead);
    let srv = TestServer::spawn_with_gateway(gateway).await;

    let res = reqwest::get(format!(
        "{}/api/ext/openlibrary?query=kadare",
        srv.base_url
    ))
    .await
    .unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "upstream_error");
}

#[tokio::test]
async fn notification_stream_delivers_live_events() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/api/notifications/stream", srv.base_url))
        .send()
        .await
        .unwrap();

    // Give the subscription a moment to register before publishing.
    tokio::time::sleep(Duration::from_millis(100)).await;
    create_book(&client, &srv.base_url, "Fresh off the press").await;

    let seen = read_stream_until(response, "Fresh off the press").await;
    assert!(seen.contains("event: tick"));
}
