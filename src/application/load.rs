use crate::application::index_sync::IndexSynchronizer;
use crate::domain::entities::product::{ImportRow, NewProduct};
use crate::domain::error::DomainError;
use crate::domain::values::product_id::ProductId;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum LoadOutcome {
    Loaded { count: usize },
    Skipped,
}

/// One line of a product CSV. Empty `id`, `rating` and `brand` cells read
/// as absent.
#[derive(Debug, Deserialize)]
struct CsvRow {
    id: Option<ProductId>,
    name: String,
    description: String,
    price: f64,
    categories: String,
    rating: Option<f64>,
    brand: Option<String>,
}

impl From<CsvRow> for ImportRow {
    fn from(row: CsvRow) -> Self {
        ImportRow {
            id: row.id,
            product: NewProduct {
                name: row.name,
                description: row.description,
                price: row.price,
                categories: row.categories,
                rating: row.rating,
                brand: row.brand,
            },
        }
    }
}

/// Seeds the store from a product file: a CSV with a header row
/// (`id,name,description,price,categories,rating,brand`) or a JSON array.
pub struct LoadUseCase {
    sync: Arc<IndexSynchronizer>,
}

impl LoadUseCase {
    pub fn new(sync: Arc<IndexSynchronizer>) -> Self {
        Self { sync }
    }

    /// Files ending in `.csv` are read as CSV, anything else as JSON.
    pub async fn load_file(&self, path: &Path, force: bool) -> Result<LoadOutcome, DomainError> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| DomainError::Io(format!("Cannot read {}: {e}", path.display())))?;
        let is_csv = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if is_csv {
            self.load_csv(&raw, force).await
        } else {
            self.load_json(&raw, force).await
        }
    }

    pub async fn load_json(&self, raw: &str, force: bool) -> Result<LoadOutcome, DomainError> {
        let rows: Vec<ImportRow> = serde_json::from_str(raw)
            .map_err(|e| DomainError::Parse(format!("Invalid product file: {e}")))?;
        self.import(&rows, force).await
    }

    pub async fn load_csv(&self, raw: &str, force: bool) -> Result<LoadOutcome, DomainError> {
        let rows = parse_csv(raw)?;
        self.import(&rows, force).await
    }

    async fn import(&self, rows: &[ImportRow], force: bool) -> Result<LoadOutcome, DomainError> {
        match self.sync.import(rows, force).await? {
            Some(count) => {
                info!(count, "Products loaded and vector index rebuilt");
                Ok(LoadOutcome::Loaded { count })
            }
            None => Ok(LoadOutcome::Skipped),
        }
    }
}

fn parse_csv(raw: &str) -> Result<Vec<ImportRow>, DomainError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(raw.as_bytes());
    reader
        .deserialize::<CsvRow>()
        .map(|row| {
            row.map(ImportRow::from)
                .map_err(|e| DomainError::Parse(format!("Invalid product CSV: {e}")))
        })
        .collect()
}
