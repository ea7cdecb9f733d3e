mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use catalog_search::api::router;
use common::{seed, setup};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

async fn app_with(names: &[&str]) -> Router {
    let catalog = setup().await;
    seed(&catalog, names).await;
    router(Arc::new(catalog))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(v) => {
            builder = builder.header("content-type", "application/json");
            Body::from(v.to_string())
        }
        None => Body::empty(),
    };
    let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

async fn send_raw(app: &Router, method: &str, uri: &str, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

#[tokio::test]
async fn test_healthz() {
    let app = app_with(&[]).await;
    let (status, _) = send(&app, "GET", "/healthz", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_create_then_get() {
    let app = app_with(&[]).await;
    let body = json!({
        "name": "Desk lamp",
        "description": "Adjustable arm",
        "price": 35.0,
        "categories": "lighting",
        "brand": "Acme"
    });

    let (status, created) = send(&app, "POST", "/products", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["id"], 1);
    assert_eq!(created["rating"], Value::Null);

    let (status, fetched) = send(&app, "GET", "/products/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_missing_product_is_404() {
    let app = app_with(&["coffee mug"]).await;

    let (status, body) = send(&app, "GET", "/products/42", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "detail": "Product not found" }));

    let (status, _) = send(&app, "PUT", "/products/42", Some(json!({ "price": 1.0 }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "DELETE", "/products/42", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_and_delete() {
    let app = app_with(&["red shoe", "blue hat"]).await;

    let (status, updated) = send(&app, "PUT", "/products/2", Some(json!({ "price": 14.5 }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["price"], 14.5);
    assert_eq!(updated["name"], "blue hat");

    let (status, removed) = send(&app, "DELETE", "/products/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(removed["name"], "red shoe");

    let (_, stats) = send(&app, "GET", "/stats", None).await;
    assert_eq!(stats["products"], 1);
    assert_eq!(stats["indexed"], 1);
}

#[tokio::test]
async fn test_null_in_patch_clears_field() {
    let app = app_with(&[]).await;
    let body = json!({
        "name": "Desk lamp",
        "description": "",
        "price": 35.0,
        "categories": "",
        "rating": 4.2,
        "brand": "Acme"
    });
    send(&app, "POST", "/products", Some(body)).await;

    let (status, updated) = send(&app, "PUT", "/products/1", Some(json!({ "brand": null }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["brand"], Value::Null);
    assert_eq!(updated["rating"], 4.2);

    let (_, fetched) = send(&app, "GET", "/products/1", None).await;
    assert_eq!(fetched["brand"], Value::Null);
}

#[tokio::test]
async fn test_list_pagination() {
    let app = app_with(&["a1", "a2", "a3", "a4"]).await;

    let (status, page) = send(&app, "GET", "/products?skip=1&limit=2", None).await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<i64> = page
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![2, 3]);

    let (status, _) = send(&app, "GET", "/products?limit=0", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = send(&app, "GET", "/products?limit=101", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_search_ranks_products() {
    let app = app_with(&["red shoe", "blue hat", "green shoe"]).await;

    let (status, found) = send(&app, "GET", "/products/search?q=shoe&top_k=2", None).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = found
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["red shoe", "green shoe"]);
}

#[tokio::test]
async fn test_search_rejects_bad_parameters() {
    let app = app_with(&["red shoe"]).await;

    for uri in [
        "/products/search?q=shoe&top_k=0",
        "/products/search?q=shoe&top_k=21",
        "/products/search?q=%20",
        "/products/search",
    ] {
        let (status, _) = send(&app, "GET", uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
    }
}

#[tokio::test]
async fn test_invalid_create_is_400() {
    let app = app_with(&[]).await;
    let body = json!({ "name": "", "description": "", "price": 1.0, "categories": "" });
    let (status, body) = send(&app, "POST", "/products", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].as_str().unwrap().contains("name"));
}

#[tokio::test]
async fn test_extractor_errors_use_detail_body() {
    let app = app_with(&["red shoe"]).await;

    let cases = [
        send(&app, "GET", "/products/search", None).await,
        send(&app, "GET", "/products/abc", None).await,
        send(&app, "GET", "/products?limit=ten", None).await,
        send_raw(&app, "POST", "/products", "{not json").await,
        send_raw(&app, "PUT", "/products/1", r#"{"price": "cheap"}"#).await,
    ];
    for (status, body) in cases {
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["detail"].is_string(), "body {body}");
    }
}
