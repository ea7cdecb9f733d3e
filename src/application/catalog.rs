use crate::application::index_sync::IndexSynchronizer;
use crate::domain::entities::product::{NewProduct, Product, ProductPatch};
use crate::domain::error::DomainError;
use crate::domain::ports::product_repository::ProductRepository;
use crate::domain::values::page::Page;
use crate::domain::values::product_id::ProductId;
use std::sync::Arc;

/// Product CRUD. Reads go straight to the store; writes go through the
/// synchronizer so the index follows them.
pub struct CatalogUseCase {
    repo: Arc<dyn ProductRepository>,
    sync: Arc<IndexSynchronizer>,
}

impl CatalogUseCase {
    pub fn new(repo: Arc<dyn ProductRepository>, sync: Arc<IndexSynchronizer>) -> Self {
        Self { repo, sync }
    }

    pub fn list(&self, page: Page) -> Result<Vec<Product>, DomainError> {
        self.repo.list(page)
    }

    pub fn get(&self, id: ProductId) -> Result<Product, DomainError> {
        self.repo
            .get(id)?
            .ok_or_else(|| DomainError::product_not_found(id.value()))
    }

    pub async fn create(&self, product: NewProduct) -> Result<Product, DomainError> {
        check_name(&product.name)?;
        check_price(product.price)?;
        check_rating(product.rating)?;
        self.sync.create(&product).await
    }

    pub async fn update(&self, id: ProductId, patch: ProductPatch) -> Result<Product, DomainError> {
        if let Some(name) = &patch.name {
            check_name(name)?;
        }
        if let Some(price) = patch.price {
            check_price(price)?;
        }
        check_rating(patch.rating.flatten())?;
        if patch.is_empty() {
            return self.get(id);
        }
        self.sync.update(id, &patch).await
    }

    pub async fn delete(&self, id: ProductId) -> Result<Product, DomainError> {
        self.sync.delete(id).await
    }
}

fn check_name(name: &str) -> Result<(), DomainError> {
    if name.trim().is_empty() {
        return Err(DomainError::InvalidInput("name must not be empty".into()));
    }
    Ok(())
}

fn check_price(price: f64) -> Result<(), DomainError> {
    if !price.is_finite() || price < 0.0 {
        return Err(DomainError::InvalidInput(format!(
            "price must be a non-negative number, got {price}"
        )));
    }
    Ok(())
}

fn check_rating(rating: Option<f64>) -> Result<(), DomainError> {
    match rating {
        Some(r) if !r.is_finite() => Err(DomainError::InvalidInput("rating must be a finite number".into())),
        _ => Ok(()),
    }
}
