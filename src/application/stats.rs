use crate::domain::error::DomainError;
use crate::domain::ports::product_repository::ProductRepository;
use crate::domain::ports::vector_index::VectorIndex;
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, Serialize)]
pub struct CatalogStats {
    pub products: usize,
    pub indexed: usize,
    pub dimension: Option<usize>,
    pub embedding_provider: String,
}

pub struct StatsUseCase {
    repo: Arc<dyn ProductRepository>,
    index: Arc<dyn VectorIndex>,
    provider: String,
}

impl StatsUseCase {
    pub fn new(repo: Arc<dyn ProductRepository>, index: Arc<dyn VectorIndex>, provider: String) -> Self {
        Self { repo, index, provider }
    }

    pub fn stats(&self) -> Result<CatalogStats, DomainError> {
        Ok(CatalogStats {
            products: self.repo.count()?,
            indexed: self.index.len(),
            dimension: self.index.dimension(),
            embedding_provider: self.provider.clone(),
        })
    }
}
