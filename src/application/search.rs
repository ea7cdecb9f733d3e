use crate::application::embedder::Embedder;
use crate::domain::entities::product::Product;
use crate::domain::error::DomainError;
use crate::domain::ports::product_repository::ProductRepository;
use crate::domain::ports::vector_index::{Neighbor, VectorIndex};
use crate::domain::values::product_id::ProductId;
use crate::domain::values::top_k::TopK;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument};

pub struct SearchUseCase {
    repo: Arc<dyn ProductRepository>,
    embedder: Embedder,
    index: Arc<dyn VectorIndex>,
}

impl SearchUseCase {
    pub fn new(
        repo: Arc<dyn ProductRepository>,
        embedder: Embedder,
        index: Arc<dyn VectorIndex>,
    ) -> Self {
        Self { repo, embedder, index }
    }

    /// Ranked nearest neighbours for `query`, closest first.
    #[instrument(skip(self), fields(top_k = %top_k))]
    pub async fn neighbors(&self, query: &str, top_k: TopK) -> Result<Vec<Neighbor>, DomainError> {
        if self.index.is_empty() {
            info!("No vector index available for search");
            return Ok(vec![]);
        }
        let vector = self.embedder.embed(query).await?;
        let hits = self.index.search(&vector, top_k.value())?;
        info!(results = hits.len(), "Semantic search complete");
        Ok(hits)
    }

    pub async fn search_ids(&self, query: &str, top_k: TopK) -> Result<Vec<ProductId>, DomainError> {
        Ok(self
            .neighbors(query, top_k)
            .await?
            .into_iter()
            .map(|n| n.id)
            .collect())
    }

    /// Ranked products for `query`. Ids that no longer resolve in the store
    /// are dropped; the rest keep the index's order.
    pub async fn search(&self, query: &str, top_k: TopK) -> Result<Vec<Product>, DomainError> {
        let ids = self.search_ids(query, top_k).await?;
        if ids.is_empty() {
            return Ok(vec![]);
        }
        let mut by_id: HashMap<ProductId, Product> = self
            .repo
            .get_many(&ids)?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();
        Ok(ids.iter().filter_map(|id| by_id.remove(id)).collect())
    }
}
