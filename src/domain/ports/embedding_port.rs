use crate::domain::error::DomainError;

#[derive(Debug, Clone, Copy)]
pub enum InputType {
    Document,
    Query,
}

/// Text embedding backend. One output vector per input text, in input order.
#[async_trait::async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed(&self, texts: &[String], input_type: InputType) -> Result<Vec<Vec<f32>>, DomainError>;
    /// Output dimension, or 0 when the backend cannot report it up front.
    fn dimension(&self) -> usize;
    fn name(&self) -> &str;
}
