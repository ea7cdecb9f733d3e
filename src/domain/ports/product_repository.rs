use crate::domain::entities::product::{ImportRow, NewProduct, Product, ProductPatch};
use crate::domain::error::DomainError;
use crate::domain::values::page::Page;
use crate::domain::values::product_id::ProductId;

/// Authoritative record store for products.
pub trait ProductRepository: Send + Sync {
    fn list(&self, page: Page) -> Result<Vec<Product>, DomainError>;
    /// Every product, ordered by id.
    fn list_all(&self) -> Result<Vec<Product>, DomainError>;
    fn get(&self, id: ProductId) -> Result<Option<Product>, DomainError>;
    /// Batch lookup. Result order is unspecified and missing ids are skipped.
    fn get_many(&self, ids: &[ProductId]) -> Result<Vec<Product>, DomainError>;
    fn create(&self, product: &NewProduct) -> Result<Product, DomainError>;
    fn update(&self, id: ProductId, patch: &ProductPatch) -> Result<Option<Product>, DomainError>;
    fn delete(&self, id: ProductId) -> Result<Option<Product>, DomainError>;
    fn count(&self) -> Result<usize, DomainError>;
    fn import(&self, rows: &[ImportRow]) -> Result<usize, DomainError>;
}
