use crate::domain::error::DomainError;
use crate::domain::values::top_k::{TopK, DEFAULT_MAX_TOP_K, DEFAULT_TOP_K};
use crate::infrastructure::embeddings::hashing::DEFAULT_DIMENSION;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Hashing,
    OpenAi,
    Voyage,
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "hashing" | "local" => Ok(ProviderKind::Hashing),
            "openai" => Ok(ProviderKind::OpenAi),
            "voyage" => Ok(ProviderKind::Voyage),
            _ => Err(format!("Unknown embedding provider: {s}")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EmbeddingConfig {
    pub provider: ProviderKind,
    pub api_key: String,
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub dimension: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchLimits {
    pub max_top_k: usize,
    pub default_top_k: usize,
}

impl SearchLimits {
    pub fn new(max_top_k: usize, default_top_k: usize) -> Result<Self, DomainError> {
        if max_top_k == 0 {
            return Err(DomainError::InvalidInput("max top_k must be at least 1".into()));
        }
        TopK::new(default_top_k, max_top_k).map_err(DomainError::InvalidInput)?;
        Ok(Self {
            max_top_k,
            default_top_k,
        })
    }

    /// Resolve a caller's `top_k`, falling back to the default when omitted.
    pub fn top_k(&self, requested: Option<usize>) -> Result<TopK, DomainError> {
        TopK::new(requested.unwrap_or(self.default_top_k), self.max_top_k)
            .map_err(DomainError::InvalidInput)
    }
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self {
            max_top_k: DEFAULT_MAX_TOP_K,
            default_top_k: DEFAULT_TOP_K,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub db_path: String,
    pub embedding: EmbeddingConfig,
    pub limits: SearchLimits,
    pub bind: String,
}

impl CatalogConfig {
    pub fn from_env() -> Result<Self, DomainError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, DomainError> {
        let provider = get("CATALOG_EMBEDDING_PROVIDER")
            .map(|p| p.parse::<ProviderKind>())
            .transpose()
            .map_err(DomainError::InvalidInput)?
            .unwrap_or(ProviderKind::Hashing);

        let embedding = EmbeddingConfig {
            provider,
            api_key: get("CATALOG_EMBEDDING_API_KEY").unwrap_or_default(),
            model: get("CATALOG_EMBEDDING_MODEL").filter(|m| !m.is_empty()),
            base_url: get("CATALOG_EMBEDDING_BASE_URL").filter(|u| !u.is_empty()),
            dimension: parse_or(&get, "CATALOG_EMBEDDING_DIM", DEFAULT_DIMENSION)?,
        };

        let limits = SearchLimits::new(
            parse_or(&get, "CATALOG_MAX_TOP_K", DEFAULT_MAX_TOP_K)?,
            parse_or(&get, "CATALOG_DEFAULT_TOP_K", DEFAULT_TOP_K)?,
        )?;

        Ok(Self {
            db_path: get("CATALOG_DB").unwrap_or_else(|| "./catalog.db".into()),
            embedding,
            limits,
            bind: get("CATALOG_BIND").unwrap_or_else(|| "127.0.0.1:8000".into()),
        })
    }
}

fn parse_or(
    get: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: usize,
) -> Result<usize, DomainError> {
    match get(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| DomainError::InvalidInput(format!("{key} must be a positive integer, got {raw}"))),
    }
}
