//! Shared test helpers.
#![allow(dead_code)]

use catalog_search::config::SearchLimits;
use catalog_search::domain::entities::product::NewProduct;
use catalog_search::domain::error::DomainError;
use catalog_search::domain::ports::embedding_port::{EmbeddingProvider, InputType};
use catalog_search::infrastructure::embeddings::hashing::HashingProvider;
use catalog_search::Catalog;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub async fn setup() -> Catalog {
    Catalog::with_provider(":memory:", Arc::new(HashingProvider::default()), SearchLimits::default())
        .await
        .unwrap()
}

pub fn product(name: &str) -> NewProduct {
    NewProduct {
        name: name.to_string(),
        description: String::new(),
        price: 10.0,
        categories: String::new(),
        rating: None,
        brand: None,
    }
}

/// Seed products with explicit ids 1..=n through a bulk load, which ends in a
/// full rebuild.
pub async fn seed(catalog: &Catalog, names: &[&str]) {
    let rows: Vec<serde_json::Value> = names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            serde_json::json!({
                "id": i as i64 + 1,
                "name": name,
                "description": "",
                "price": 10.0,
                "categories": ""
            })
        })
        .collect();
    catalog
        .load_json(&serde_json::to_string(&rows).unwrap(), true)
        .await
        .unwrap();
}

/// Hashing embedder that can be switched into a failing state.
pub struct SwitchableProvider {
    inner: HashingProvider,
    failing: AtomicBool,
}

impl SwitchableProvider {
    pub fn new() -> Self {
        Self {
            inner: HashingProvider::default(),
            failing: AtomicBool::new(false),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for SwitchableProvider {
    async fn embed(&self, texts: &[String], input_type: InputType) -> Result<Vec<Vec<f32>>, DomainError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(DomainError::Embedding("model unavailable".into()));
        }
        self.inner.embed(texts, input_type).await
    }

    fn dimension(&self) -> usize {
        self.inner.dimension()
    }

    fn name(&self) -> &str {
        "switchable"
    }
}
