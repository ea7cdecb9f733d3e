pub mod api;
pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

use crate::application::catalog::CatalogUseCase;
use crate::application::embedder::Embedder;
use crate::application::index_sync::IndexSynchronizer;
use crate::application::load::{LoadOutcome, LoadUseCase};
use crate::application::search::SearchUseCase;
use crate::application::stats::{CatalogStats, StatsUseCase};
use crate::config::{CatalogConfig, ProviderKind, SearchLimits};
use crate::domain::entities::product::{NewProduct, Product, ProductPatch};
use crate::domain::error::DomainError;
use crate::domain::ports::embedding_port::EmbeddingProvider;
use crate::domain::ports::product_repository::ProductRepository;
use crate::domain::ports::vector_index::{Neighbor, VectorIndex};
use crate::domain::values::page::Page;
use crate::domain::values::product_id::ProductId;
use crate::infrastructure::embeddings::hashing::HashingProvider;
use crate::infrastructure::embeddings::openai::OpenAiProvider;
use crate::infrastructure::embeddings::voyage::VoyageProvider;
use crate::infrastructure::memory::flat_index::FlatIndex;
use crate::infrastructure::sqlite::migrations::run_migrations;
use crate::infrastructure::sqlite::product_repo::SqliteProductRepo;
use rusqlite::Connection;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// The assembled catalog service. Built once at startup and shared by the
/// HTTP and CLI surfaces.
pub struct Catalog {
    catalog_uc: CatalogUseCase,
    search_uc: SearchUseCase,
    stats_uc: StatsUseCase,
    load_uc: LoadUseCase,
    sync: Arc<IndexSynchronizer>,
    index: Arc<dyn VectorIndex>,
    limits: SearchLimits,
}

impl Catalog {
    pub async fn open(config: &CatalogConfig) -> Result<Self, DomainError> {
        let embedding = &config.embedding;
        let provider: Arc<dyn EmbeddingProvider> = match embedding.provider {
            ProviderKind::Hashing => Arc::new(HashingProvider::new(embedding.dimension)),
            ProviderKind::OpenAi => Arc::new(OpenAiProvider::new(
                embedding.api_key.clone(),
                embedding.model.clone(),
                embedding.base_url.clone(),
            )),
            ProviderKind::Voyage => Arc::new(VoyageProvider::new(
                embedding.api_key.clone(),
                embedding.model.clone(),
                embedding.base_url.clone(),
            )),
        };
        Self::with_provider(&config.db_path, provider, config.limits).await
    }

    /// Construct every component in order (store, embedder, index), check the
    /// embedding backend, then build the index from the store. A backend that
    /// cannot embed fails startup.
    pub async fn with_provider(
        db_path: &str,
        provider: Arc<dyn EmbeddingProvider>,
        limits: SearchLimits,
    ) -> Result<Self, DomainError> {
        let conn = Connection::open(db_path)
            .map_err(|e| DomainError::Database(format!("DB error: {e}")))?;
        if db_path != ":memory:" {
            conn.pragma_update(None, "journal_mode", "WAL")
                .map_err(|e| DomainError::Database(format!("WAL error: {e}")))?;
        }
        run_migrations(&conn)?;
        let repo: Arc<dyn ProductRepository> = Arc::new(SqliteProductRepo::new(conn));

        info!(provider = provider.name(), "Loading embedding provider");
        let embedder = Embedder::new(provider);
        let dimension = embedder.probe().await?;
        info!(dimension, "Embedding provider ready");

        let index: Arc<dyn VectorIndex> = Arc::new(FlatIndex::new());
        let sync = Arc::new(IndexSynchronizer::new(
            repo.clone(),
            embedder.clone(),
            index.clone(),
        ));

        let catalog = Self {
            catalog_uc: CatalogUseCase::new(repo.clone(), sync.clone()),
            search_uc: SearchUseCase::new(repo.clone(), embedder.clone(), index.clone()),
            stats_uc: StatsUseCase::new(repo, index.clone(), embedder.provider_name().to_string()),
            load_uc: LoadUseCase::new(sync.clone()),
            sync,
            index,
            limits,
        };
        catalog.reindex().await?;
        Ok(catalog)
    }

    pub fn list(&self, page: Page) -> Result<Vec<Product>, DomainError> {
        self.catalog_uc.list(page)
    }

    pub fn get(&self, id: ProductId) -> Result<Product, DomainError> {
        self.catalog_uc.get(id)
    }

    pub async fn create(&self, product: NewProduct) -> Result<Product, DomainError> {
        self.catalog_uc.create(product).await
    }

    pub async fn update(&self, id: ProductId, patch: ProductPatch) -> Result<Product, DomainError> {
        self.catalog_uc.update(id, patch).await
    }

    pub async fn delete(&self, id: ProductId) -> Result<Product, DomainError> {
        self.catalog_uc.delete(id).await
    }

    /// Semantic search. `top_k` defaults from [`SearchLimits`] and must lie
    /// within them.
    pub async fn search(&self, query: &str, top_k: Option<usize>) -> Result<Vec<Product>, DomainError> {
        let top_k = self.limits.top_k(top_k)?;
        self.search_uc.search(query, top_k).await
    }

    pub async fn search_ids(&self, query: &str, top_k: Option<usize>) -> Result<Vec<ProductId>, DomainError> {
        let top_k = self.limits.top_k(top_k)?;
        self.search_uc.search_ids(query, top_k).await
    }

    pub async fn neighbors(&self, query: &str, top_k: Option<usize>) -> Result<Vec<Neighbor>, DomainError> {
        let top_k = self.limits.top_k(top_k)?;
        self.search_uc.neighbors(query, top_k).await
    }

    pub async fn reindex(&self) -> Result<usize, DomainError> {
        self.sync.rebuild().await
    }

    /// Replace the index with exactly `products`, which need not match the
    /// store. The next mutation or reindex rebuilds from the store again.
    pub async fn rebuild_from(&self, products: &[Product]) -> Result<usize, DomainError> {
        self.sync.rebuild_from(products).await
    }

    pub async fn load(&self, path: &Path, force: bool) -> Result<LoadOutcome, DomainError> {
        self.load_uc.load_file(path, force).await
    }

    pub async fn load_json(&self, raw: &str, force: bool) -> Result<LoadOutcome, DomainError> {
        self.load_uc.load_json(raw, force).await
    }

    pub fn stats(&self) -> Result<CatalogStats, DomainError> {
        self.stats_uc.stats()
    }

    /// Ids currently held by the vector index, in position order.
    pub fn indexed_ids(&self) -> Vec<ProductId> {
        self.index.ids()
    }
}
