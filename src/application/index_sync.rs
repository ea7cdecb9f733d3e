//! Keeps the vector index consistent with the product store.
//!
//! | Event   | Index action                        |
//! |---------|-------------------------------------|
//! | create  | embed the new product and append it |
//! | update  | rebuild from the full product set   |
//! | delete  | rebuild from the full product set   |
//! | startup | rebuild from the full product set   |
//! | import  | rebuild from the full product set   |
//!
//! The index has no positional remove, so update and delete cost O(n)
//! embeddings. That is the accepted limit for catalog-sized stores.
//!
//! Every event holds one writer lock across the store mutation and the
//! index publish. Searches never take it.

use crate::application::embedder::Embedder;
use crate::domain::entities::product::{ImportRow, NewProduct, Product, ProductPatch};
use crate::domain::error::DomainError;
use crate::domain::ports::product_repository::ProductRepository;
use crate::domain::ports::vector_index::VectorIndex;
use crate::domain::values::product_id::ProductId;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, instrument, warn};

pub struct IndexSynchronizer {
    repo: Arc<dyn ProductRepository>,
    embedder: Embedder,
    index: Arc<dyn VectorIndex>,
    writer: Mutex<()>,
}

impl IndexSynchronizer {
    pub fn new(
        repo: Arc<dyn ProductRepository>,
        embedder: Embedder,
        index: Arc<dyn VectorIndex>,
    ) -> Self {
        Self {
            repo,
            embedder,
            index,
            writer: Mutex::new(()),
        }
    }

    /// Rebuild the whole index from the store. Returns the indexed count.
    pub async fn rebuild(&self) -> Result<usize, DomainError> {
        let _writer = self.writer.lock().await;
        self.rebuild_locked().await
    }

    /// Store a new product and append its embedding.
    ///
    /// If embedding fails the product stays stored but unindexed until the
    /// next rebuild, and the error is returned.
    #[instrument(skip(self, new), fields(name = %new.name))]
    pub async fn create(&self, new: &NewProduct) -> Result<Product, DomainError> {
        let _writer = self.writer.lock().await;
        let product = self.repo.create(new)?;
        info!(id = %product.id, "Adding embedding for product");
        let vector = self.embedder.embed_record(&product).await.inspect_err(|e| {
            warn!(id = %product.id, error = %e, "Product stored without embedding");
        })?;
        self.index.add(product.id, vector)?;
        Ok(product)
    }

    #[instrument(skip(self, patch))]
    pub async fn update(&self, id: ProductId, patch: &ProductPatch) -> Result<Product, DomainError> {
        let _writer = self.writer.lock().await;
        let product = self
            .repo
            .update(id, patch)?
            .ok_or_else(|| DomainError::product_not_found(id.value()))?;
        info!("Updating embedding for product (rebuilding index)");
        self.rebuild_locked().await?;
        Ok(product)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: ProductId) -> Result<Product, DomainError> {
        let _writer = self.writer.lock().await;
        let product = self
            .repo
            .delete(id)?
            .ok_or_else(|| DomainError::product_not_found(id.value()))?;
        info!("Deleting embedding for product (rebuilding index)");
        self.rebuild_locked().await?;
        Ok(product)
    }

    /// Bulk import followed by a rebuild. With `force` false, nothing is
    /// imported into a non-empty store and `None` is returned.
    pub async fn import(&self, rows: &[ImportRow], force: bool) -> Result<Option<usize>, DomainError> {
        let _writer = self.writer.lock().await;
        if !force && self.repo.count()? > 0 {
            info!("Products already loaded, skipping import");
            return Ok(None);
        }
        let imported = self.repo.import(rows)?;
        self.rebuild_locked().await?;
        Ok(Some(imported))
    }

    /// Replace the index with embeddings of exactly `products`. Nothing is
    /// published unless every embedding succeeds.
    pub async fn rebuild_from(&self, products: &[Product]) -> Result<usize, DomainError> {
        let _writer = self.writer.lock().await;
        self.publish(products).await
    }

    async fn publish(&self, products: &[Product]) -> Result<usize, DomainError> {
        let vectors = self.embedder.embed_records(products).await?;
        let entries: Vec<(ProductId, Vec<f32>)> =
            products.iter().map(|p| p.id).zip(vectors).collect();
        let count = entries.len();
        self.index.replace(entries)?;
        Ok(count)
    }

    async fn rebuild_locked(&self) -> Result<usize, DomainError> {
        info!("Rebuilding vector index from product store");
        let products = self.repo.list_all()?;
        let count = self.publish(&products).await.inspect_err(|e| {
            warn!(error = %e, "Rebuild failed, keeping previous index");
        })?;
        info!(count, "Vector index rebuilt");
        Ok(count)
    }
}
