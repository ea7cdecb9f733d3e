use crate::domain::entities::product::Product;
use crate::domain::error::DomainError;
use crate::domain::ports::embedding_port::{EmbeddingProvider, InputType};
use std::sync::Arc;
use tracing::{debug, warn};

const BATCH_SIZE: usize = 32;
const PROBE_TEXT: &str = "catalog embedding probe";

/// Wraps an [`EmbeddingProvider`] and guarantees unit-length output, so that
/// squared Euclidean distance ranks like cosine similarity.
#[derive(Clone)]
pub struct Embedder {
    provider: Arc<dyn EmbeddingProvider>,
}

impl Embedder {
    pub fn new(provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self { provider }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Embed a search query.
    pub async fn embed(&self, text: &str) -> Result<Vec<f32>, DomainError> {
        let mut vectors = self.embed_batch(&[text.to_string()], InputType::Query).await?;
        vectors
            .pop()
            .ok_or_else(|| DomainError::Embedding("provider returned no vector".into()))
    }

    pub async fn embed_record(&self, product: &Product) -> Result<Vec<f32>, DomainError> {
        let mut vectors = self
            .embed_batch(&[product.searchable_text()], InputType::Document)
            .await?;
        vectors
            .pop()
            .ok_or_else(|| DomainError::Embedding("provider returned no vector".into()))
    }

    /// Embed many products, in order. Fails as a whole if any batch fails.
    pub async fn embed_records(&self, products: &[Product]) -> Result<Vec<Vec<f32>>, DomainError> {
        let mut out = Vec::with_capacity(products.len());
        for chunk in products.chunks(BATCH_SIZE) {
            let texts: Vec<String> = chunk.iter().map(|p| p.searchable_text()).collect();
            out.extend(self.embed_batch(&texts, InputType::Document).await?);
            debug!(done = out.len(), total = products.len(), "Generating embeddings");
        }
        Ok(out)
    }

    /// Embed a fixed string to confirm the backend is reachable. Returns the
    /// observed dimension.
    pub async fn probe(&self) -> Result<usize, DomainError> {
        let dimension = self.embed(PROBE_TEXT).await?.len();
        let reported = self.provider.dimension();
        if reported > 0 && reported != dimension {
            warn!(
                reported,
                observed = dimension,
                provider = self.provider.name(),
                "Embedding provider dimension differs from its output"
            );
        }
        Ok(dimension)
    }

    async fn embed_batch(&self, texts: &[String], input_type: InputType) -> Result<Vec<Vec<f32>>, DomainError> {
        let vectors = self.provider.embed(texts, input_type).await?;
        if vectors.len() != texts.len() {
            return Err(DomainError::Embedding(format!(
                "expected {} vectors from {}, got {}",
                texts.len(),
                self.provider.name(),
                vectors.len()
            )));
        }
        vectors
            .into_iter()
            .map(|v| {
                if v.is_empty() {
                    Err(DomainError::Embedding(format!(
                        "{} returned an empty vector",
                        self.provider.name()
                    )))
                } else {
                    Ok(normalize(v))
                }
            })
            .collect()
    }
}

/// Scale to unit L2 length. A zero vector has no direction and is returned
/// unchanged.
pub fn normalize(mut v: Vec<f32>) -> Vec<f32> {
    let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        v.iter_mut().for_each(|x| *x /= norm);
    }
    v
}
