use crate::api::error::ApiError;
use crate::api::extract::{ApiJson, ApiPath, ApiQuery};
use crate::application::stats::CatalogStats;
use crate::domain::entities::product::{NewProduct, Product, ProductPatch};
use crate::domain::values::page::{Page, DEFAULT_LIMIT};
use crate::domain::values::product_id::ProductId;
use crate::Catalog;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    skip: usize,
    #[serde(default = "default_limit")]
    limit: usize,
}

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    q: String,
    top_k: Option<usize>,
}

pub fn router(catalog: Arc<Catalog>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/healthz", get(healthz))
        .route("/stats", get(stats))
        .route("/products", get(list_products).post(create_product))
        .route("/products/search", get(search_products))
        .route(
            "/products/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(catalog)
}

async fn root() -> Json<Value> {
    Json(json!({ "message": "Product catalog with semantic search" }))
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

async fn stats(State(catalog): State<Arc<Catalog>>) -> ApiResult<Json<CatalogStats>> {
    Ok(Json(catalog.stats()?))
}

async fn list_products(
    State(catalog): State<Arc<Catalog>>,
    ApiQuery(params): ApiQuery<ListParams>,
) -> ApiResult<Json<Vec<Product>>> {
    let page = Page::new(params.skip, params.limit).map_err(ApiError::bad_request)?;
    Ok(Json(catalog.list(page)?))
}

async fn search_products(
    State(catalog): State<Arc<Catalog>>,
    ApiQuery(params): ApiQuery<SearchParams>,
) -> ApiResult<Json<Vec<Product>>> {
    if params.q.trim().is_empty() {
        return Err(ApiError::bad_request("query text must not be empty"));
    }
    Ok(Json(catalog.search(&params.q, params.top_k).await?))
}

async fn get_product(
    State(catalog): State<Arc<Catalog>>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<Product>> {
    Ok(Json(catalog.get(ProductId::new(id))?))
}

async fn create_product(
    State(catalog): State<Arc<Catalog>>,
    ApiJson(input): ApiJson<NewProduct>,
) -> ApiResult<(StatusCode, Json<Product>)> {
    let product = catalog.create(input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

async fn update_product(
    State(catalog): State<Arc<Catalog>>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(patch): ApiJson<ProductPatch>,
) -> ApiResult<Json<Product>> {
    Ok(Json(catalog.update(ProductId::new(id), patch).await?))
}

async fn delete_product(
    State(catalog): State<Arc<Catalog>>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<Product>> {
    Ok(Json(catalog.delete(ProductId::new(id)).await?))
}
