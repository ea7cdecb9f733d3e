use crate::domain::error::DomainError;
use crate::domain::values::product_id::ProductId;
use serde::Serialize;

/// A search hit: the owning product and its squared Euclidean distance to
/// the query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Neighbor {
    pub id: ProductId,
    pub distance: f32,
}

/// In-memory similarity index over fixed-dimension vectors, each owned by
/// one product.
///
/// Positions are the only link between a stored vector and its id, so there
/// is no remove or replace-one operation. Entries are dropped or changed only
/// through [`VectorIndex::replace`] with a freshly built set.
pub trait VectorIndex: Send + Sync {
    /// Atomically swap in a whole new set of entries. An empty set leaves
    /// the index absent. On error the previous state is untouched.
    fn replace(&self, entries: Vec<(ProductId, Vec<f32>)>) -> Result<(), DomainError>;

    /// Append one entry. The first vector into an absent index fixes the
    /// dimension.
    fn add(&self, id: ProductId, vector: Vec<f32>) -> Result<(), DomainError>;

    /// Up to `top_k` nearest entries, closest first. Equal distances keep
    /// insertion order. An absent index yields no hits.
    fn search(&self, query: &[f32], top_k: usize) -> Result<Vec<Neighbor>, DomainError>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `None` while the index is absent.
    fn dimension(&self) -> Option<usize>;

    /// Indexed ids in position order.
    fn ids(&self) -> Vec<ProductId>;
}
