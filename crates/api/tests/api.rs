//! Router tests against the in-memory record store.
//!
//! Each test builds the full application (routes, CORS, trace layer) and
//! drives it with `oneshot`, so no server or database is needed.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

use repurpose_api::state::AppState;
use repurpose_api::store::memory::MemoryStore;
use repurpose_api::store::{
    Collection, DEFAULT_TIMEOUT, Document, DocumentStore, Filter, RecordGateway, StoreError,
};

// =============================================================================
// Helpers
// =============================================================================

fn app_with(store: Arc<dyn DocumentStore>, timeout: Duration) -> Router {
    let state = AppState::new(RecordGateway::new(store, timeout));
    repurpose_api::app(state, &[])
}

fn app() -> Router {
    app_with(Arc::new(MemoryStore::new()), DEFAULT_TIMEOUT)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };
    (status, body)
}

async fn post_json(app: &Router, uri: &str, body: &Value) -> (StatusCode, Value) {
    let request = Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

fn ada() -> Value {
    json!({"name": "Ada", "email": "ada@example.com", "password": "s3cret"})
}

fn shoe() -> Value {
    json!({
        "name": "Shoe",
        "price": "₹450",
        "quantity": 3,
        "imageurl": "https://img.example/shoe.png",
        "companyname": "Acme"
    })
}

/// Every response body carries `status`, `message` and `data`, with
/// `status` matching the HTTP code.
fn assert_envelope(status: StatusCode, body: &Value) {
    assert_eq!(body["status"], status.as_u16(), "body: {body}");
    assert!(body["message"].is_string(), "body: {body}");
    assert!(body.get("data").is_some(), "body: {body}");
}

/// A store whose every operation hangs.
struct StalledStore;

#[async_trait]
impl DocumentStore for StalledStore {
    async fn insert(&self, _: Collection, _: Document) -> Result<Uuid, StoreError> {
        std::future::pending().await
    }

    async fn find_one(&self, _: Collection, _: &Filter) -> Result<Document, StoreError> {
        std::future::pending().await
    }

    async fn find_all(&self, _: Collection, _: &Filter) -> Result<Vec<Document>, StoreError> {
        std::future::pending().await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        std::future::pending().await
    }
}

/// A store that refuses every connection.
struct DownStore;

#[async_trait]
impl DocumentStore for DownStore {
    async fn insert(&self, _: Collection, _: Document) -> Result<Uuid, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn find_one(&self, _: Collection, _: &Filter) -> Result<Document, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn find_all(&self, _: Collection, _: &Filter) -> Result<Vec<Document>, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }
}

// =============================================================================
// Users
// =============================================================================

#[tokio::test]
async fn test_register_then_login() {
    let app = app();

    let (status, body) = post_json(&app, "/createUser", &ada()).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_envelope(status, &body);
    assert_eq!(body["message"], "Created User Successfully");
    let inserted_id = body["data"]["insertedId"].as_str().unwrap().to_string();
    assert!(Uuid::parse_str(&inserted_id).is_ok());
    assert_eq!(body["data"]["user"]["_id"], inserted_id.as_str());
    assert_eq!(body["data"]["user"]["email"], "ada@example.com");
    assert_eq!(body["data"]["user"]["name"], "Ada");
    assert_eq!(body["data"]["user"]["role"], "user");

    let (status, body) = post_json(
        &app,
        "/getUser",
        &json!({"email": "ada@example.com", "password": "s3cret"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_envelope(status, &body);
    assert_eq!(body["data"]["_id"], inserted_id.as_str());
    assert_eq!(body["data"]["email"], "ada@example.com");
}

#[tokio::test]
async fn test_register_response_never_contains_password_material() {
    let app = app();

    let (status, body) = post_json(&app, "/createUser", &ada()).await;
    assert_eq!(status, StatusCode::CREATED);

    let text = body.to_string();
    assert!(!text.contains("s3cret"));
    assert!(!text.contains("password"));
    assert!(!text.contains("$argon2"));
}

#[tokio::test]
async fn test_register_keeps_supplied_role() {
    let app = app();

    let mut payload = ada();
    payload["role"] = json!("admin");
    let (status, body) = post_json(&app, "/createUser", &payload).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["user"]["role"], "admin");
}

#[tokio::test]
async fn test_register_duplicate_email_conflicts() {
    let app = app();

    let (status, _) = post_json(&app, "/createUser", &ada()).await;
    assert_eq!(status, StatusCode::CREATED);

    let mut again = ada();
    again["password"] = json!("different");
    let (status, body) = post_json(&app, "/createUser", &again).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_envelope(status, &body);
    assert!(body["data"]["error"].is_string());
    assert!(!body.to_string().contains("$argon2"));

    // The original password still works.
    let (status, _) = post_json(
        &app,
        "/getUser",
        &json!({"email": "ada@example.com", "password": "s3cret"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_register_rejects_malformed_body() {
    let app = app();

    let (status, body) = post_json(&app, "/createUser", &json!({"name": "Ada"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_envelope(status, &body);

    let request = Request::post("/createUser")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_envelope(status, &body);
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let app = app();
    post_json(&app, "/createUser", &ada()).await;

    let (wrong_status, wrong_body) = post_json(
        &app,
        "/getUser",
        &json!({"email": "ada@example.com", "password": "nope"}),
    )
    .await;
    let (unknown_status, unknown_body) = post_json(
        &app,
        "/getUser",
        &json!({"email": "nobody@example.com", "password": "nope"}),
    )
    .await;

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_envelope(wrong_status, &wrong_body);
    assert_eq!(wrong_body, unknown_body);
    assert!(!wrong_body.to_string().contains("$argon2"));
}

#[tokio::test]
async fn test_user_profile_lookup() {
    let app = app();

    let (_, body) = post_json(&app, "/createUser", &ada()).await;
    let id = body["data"]["insertedId"].as_str().unwrap().to_string();

    let (status, body) = get(&app, &format!("/users/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_envelope(status, &body);
    assert_eq!(body["data"]["user"]["_id"], id.as_str());
    assert_eq!(body["data"]["user"]["email"], "ada@example.com");
    assert!(!body.to_string().contains("$argon2"));

    let (status, _) = get(&app, &format!("/users/{}", Uuid::new_v4())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = get(&app, "/users/not-a-uuid").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// =============================================================================
// Products
// =============================================================================

#[tokio::test]
async fn test_create_then_fetch_product() {
    let app = app();

    let (status, body) = post_json(&app, "/createProduct", &shoe()).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_envelope(status, &body);
    let id = body["data"]["insertedId"].as_str().unwrap().to_string();
    assert_eq!(body["data"]["product"]["_id"], id.as_str());

    let (status, body) = get(&app, &format!("/product/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_envelope(status, &body);

    let product = &body["data"]["product"];
    assert_eq!(product["_id"], id.as_str());
    assert_eq!(product["name"], "Shoe");
    assert_eq!(product["price"], "₹450");
    assert_eq!(product["quantity"], 3);
    assert_eq!(product["imageurl"], "https://img.example/shoe.png");
    assert_eq!(product["companyname"], "Acme");
}

#[tokio::test]
async fn test_create_product_ignores_client_id() {
    let app = app();

    let forced = Uuid::new_v4().to_string();
    let mut payload = shoe();
    payload["_id"] = json!(forced);

    let (status, body) = post_json(&app, "/createProduct", &payload).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_ne!(body["data"]["insertedId"], forced.as_str());
}

#[tokio::test]
async fn test_create_product_rejects_wrong_types() {
    let app = app();

    let mut payload = shoe();
    payload["quantity"] = json!("three");
    let (status, body) = post_json(&app, "/createProduct", &payload).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_envelope(status, &body);

    let (_, body) = get(&app, "/allProducts").await;
    assert_eq!(body["data"]["products"], json!([]));
}

#[tokio::test]
async fn test_list_products() {
    let app = app();

    let (status, body) = get(&app, "/allProducts").await;
    assert_eq!(status, StatusCode::OK);
    assert_envelope(status, &body);
    assert_eq!(body["data"]["products"], json!([]));

    post_json(&app, "/createProduct", &shoe()).await;
    let mut hat = shoe();
    hat["name"] = json!("Hat");
    post_json(&app, "/createProduct", &hat).await;

    let (status, body) = get(&app, "/allProducts").await;
    assert_eq!(status, StatusCode::OK);
    let products = body["data"]["products"].as_array().unwrap();
    assert_eq!(products.len(), 2);
    assert_eq!(products[0]["name"], "Shoe");
    assert_eq!(products[1]["name"], "Hat");
}

#[tokio::test]
async fn test_product_lookup_errors() {
    let app = app();

    let (status, body) = get(&app, "/product/xyz").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_envelope(status, &body);

    let (status, body) = get(&app, &format!("/product/{}", Uuid::new_v4())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_envelope(status, &body);
}

// =============================================================================
// Store failures
// =============================================================================

#[tokio::test]
async fn test_malformed_id_never_reaches_the_store() {
    // A stalled store would turn any query into a 503.
    let app = app_with(Arc::new(StalledStore), Duration::from_millis(50));

    let (status, _) = get(&app, "/product/xyz").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_stalled_store_times_out() {
    let app = app_with(Arc::new(StalledStore), Duration::from_millis(50));

    let (status, body) = get(&app, "/allProducts").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_envelope(status, &body);

    let (status, _) = post_json(&app, "/createUser", &ada()).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_unreachable_store_is_unavailable() {
    let app = app_with(Arc::new(DownStore), DEFAULT_TIMEOUT);

    let (status, body) = post_json(&app, "/createProduct", &shoe()).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_envelope(status, &body);
    assert!(!body.to_string().contains("connection refused"));

    let (status, _) = post_json(
        &app,
        "/getUser",
        &json!({"email": "ada@example.com", "password": "s3cret"}),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

// =============================================================================
// Routing errors
// =============================================================================

#[tokio::test]
async fn test_undecodable_path_is_enveloped() {
    let app = app();

    let (status, body) = get(&app, "/product/%FF").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_envelope(status, &body);
    assert!(body["data"]["error"].is_string());

    let (status, body) = get(&app, "/users/%FF").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_envelope(status, &body);
}

#[tokio::test]
async fn test_unknown_route_is_enveloped() {
    let app = app();

    for uri in ["/product/", "/products", "/nowhere"] {
        let (status, body) = get(&app, uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "uri: {uri}");
        assert_envelope(status, &body);
    }
}

#[tokio::test]
async fn test_wrong_method_is_enveloped() {
    let app = app();

    let (status, body) = get(&app, "/createUser").await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_envelope(status, &body);

    let (status, body) = post_json(&app, "/allProducts", &json!({})).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_envelope(status, &body);
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health_endpoints() {
    let app = app();
    let (status, body) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("ok".to_string()));

    let (status, _) = get(&app, "/health/ready").await;
    assert_eq!(status, StatusCode::OK);

    let app = app_with(Arc::new(DownStore), DEFAULT_TIMEOUT);
    let (status, _) = get(&app, "/health/ready").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}
