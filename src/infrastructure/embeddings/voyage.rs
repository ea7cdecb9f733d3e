use crate::domain::error::DomainError;
use crate::domain::ports::embedding_port::{EmbeddingProvider, InputType};
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Voyage AI embeddings. Distinguishes document and query inputs, which
/// the catalog uses for product text versus search strings.
pub struct VoyageProvider {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

#[derive(Serialize)]
struct VoyageRequest<'a> {
    input: &'a [String],
    model: &'a str,
    input_type: &'static str,
    truncation: bool,
}

#[derive(Deserialize)]
struct VoyageResponse {
    data: Vec<VoyageEmbedding>,
}

impl VoyageResponse {
    /// Vectors in request order; the API may return items in any order.
    fn into_vectors(mut self) -> Vec<Vec<f32>> {
        self.data.sort_by_key(|d| d.index);
        self.data.into_iter().map(|d| d.embedding).collect()
    }
}

#[derive(Deserialize)]
struct VoyageEmbedding {
    index: usize,
    embedding: Vec<f32>,
}

impl VoyageProvider {
    pub fn new(api_key: String, model: Option<String>, base_url: Option<String>) -> Self {
        Self {
            client: Client::new(),
            api_key,
            model: model.unwrap_or_else(|| "voyage-3-lite".to_string()),
            base_url: base_url
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or_else(|| "https://api.voyageai.com".to_string()),
        }
    }

    fn model_dimension(model: &str) -> usize {
        match model {
            "voyage-3-lite" | "voyage-3.5-lite" => 512,
            "voyage-3" | "voyage-3.5" | "voyage-code-3" => 1024,
            "voyage-3-large" => 1024,
            _ => 0,
        }
    }

    fn input_type(input_type: InputType) -> &'static str {
        match input_type {
            InputType::Document => "document",
            InputType::Query => "query",
        }
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for VoyageProvider {
    async fn embed(&self, texts: &[String], input_type: InputType) -> Result<Vec<Vec<f32>>, DomainError> {
        let url = format!("{}/v1/embeddings", self.base_url);
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&VoyageRequest {
                input: texts,
                model: &self.model,
                input_type: Self::input_type(input_type),
                truncation: true,
            })
            .send()
            .await
            .map_err(|e| DomainError::Embedding(format!("Voyage API error: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(DomainError::Embedding(format!("Voyage API {status}: {body}")));
        }

        let result: VoyageResponse = resp
            .json()
            .await
            .map_err(|e| DomainError::Parse(format!("Voyage response: {e}")))?;
        Ok(result.into_vectors())
    }

    fn dimension(&self) -> usize {
        Self::model_dimension(&self.model)
    }

    fn name(&self) -> &str {
        "voyage"
    }
}
