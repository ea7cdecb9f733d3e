//! Exact brute-force vector index.
//!
//! Vectors live in one flat row-major buffer next to a parallel id array.
//! Both sit in a single snapshot behind one `RwLock`, so readers see either
//! the old or the new arrays and never a mix.

use crate::domain::error::DomainError;
use crate::domain::ports::vector_index::{Neighbor, VectorIndex};
use crate::domain::values::product_id::ProductId;
use std::cmp::Ordering;
use std::sync::RwLock;
use tracing::{debug, info};

#[derive(Debug)]
struct Snapshot {
    dimension: usize,
    /// `ids.len() * dimension` floats; row `i` belongs to `ids[i]`.
    vectors: Vec<f32>,
    ids: Vec<ProductId>,
}

impl Snapshot {
    fn with_dimension(dimension: usize, capacity: usize) -> Self {
        Self {
            dimension,
            vectors: Vec::with_capacity(capacity * dimension),
            ids: Vec::with_capacity(capacity),
        }
    }

    fn push(&mut self, id: ProductId, vector: &[f32]) -> Result<(), DomainError> {
        if vector.len() != self.dimension {
            return Err(DomainError::DimensionMismatch {
                expected: self.dimension,
                actual: vector.len(),
            });
        }
        self.vectors.extend_from_slice(vector);
        self.ids.push(id);
        Ok(())
    }

    fn row(&self, position: usize) -> &[f32] {
        let start = position * self.dimension;
        &self.vectors[start..start + self.dimension]
    }
}

#[derive(Debug, Default)]
pub struct FlatIndex {
    inner: RwLock<Option<Snapshot>>,
}

impl FlatIndex {
    pub fn new() -> Self {
        Self::default()
    }

    fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
        a.iter()
            .zip(b.iter())
            .map(|(x, y)| {
                let d = x - y;
                d * d
            })
            .sum()
    }

    fn rank(hit: &(f32, usize), other: &(f32, usize)) -> Ordering {
        hit.0.total_cmp(&other.0).then(hit.1.cmp(&other.1))
    }
}

impl VectorIndex for FlatIndex {
    fn replace(&self, entries: Vec<(ProductId, Vec<f32>)>) -> Result<(), DomainError> {
        let next = match entries.first() {
            None => None,
            Some((_, first)) => {
                if first.is_empty() {
                    return Err(DomainError::InvalidInput("empty vector".into()));
                }
                let mut snapshot = Snapshot::with_dimension(first.len(), entries.len());
                for (id, vector) in &entries {
                    snapshot.push(*id, vector)?;
                }
                Some(snapshot)
            }
        };

        let count = next.as_ref().map_or(0, |s| s.ids.len());
        let mut guard = self.inner.write().unwrap_or_else(|e| e.into_inner());
        *guard = next;
        drop(guard);

        if count == 0 {
            info!("Vector index cleared (no products)");
        } else {
            info!(count, "Vector index replaced");
        }
        Ok(())
    }

    fn add(&self, id: ProductId, vector: Vec<f32>) -> Result<(), DomainError> {
        if vector.is_empty() {
            return Err(DomainError::InvalidInput("empty vector".into()));
        }
        let mut guard = self.inner.write().unwrap_or_else(|e| e.into_inner());
        let snapshot = guard.get_or_insert_with(|| Snapshot::with_dimension(vector.len(), 1));
        snapshot.push(id, &vector)?;
        debug!(%id, size = snapshot.ids.len(), "Appended vector");
        Ok(())
    }

    fn search(&self, query: &[f32], top_k: usize) -> Result<Vec<Neighbor>, DomainError> {
        let guard = self.inner.read().unwrap_or_else(|e| e.into_inner());
        let snapshot = match guard.as_ref() {
            Some(s) if !s.ids.is_empty() && top_k > 0 => s,
            _ => return Ok(vec![]),
        };
        if query.len() != snapshot.dimension {
            return Err(DomainError::DimensionMismatch {
                expected: snapshot.dimension,
                actual: query.len(),
            });
        }

        let mut hits: Vec<(f32, usize)> = (0..snapshot.ids.len())
            .map(|pos| (Self::squared_l2(query, snapshot.row(pos)), pos))
            .collect();

        // (distance, position) is a total order, so partial selection stays
        // deterministic and ties fall back to insertion order.
        if top_k < hits.len() {
            hits.select_nth_unstable_by(top_k - 1, Self::rank);
            hits.truncate(top_k);
        }
        hits.sort_unstable_by(Self::rank);

        Ok(hits
            .into_iter()
            .map(|(distance, pos)| Neighbor {
                id: snapshot.ids[pos],
                distance,
            })
            .collect())
    }

    fn len(&self) -> usize {
        let guard = self.inner.read().unwrap_or_else(|e| e.into_inner());
        guard.as_ref().map_or(0, |s| s.ids.len())
    }

    fn dimension(&self) -> Option<usize> {
        let guard = self.inner.read().unwrap_or_else(|e| e.into_inner());
        guard.as_ref().map(|s| s.dimension)
    }

    fn ids(&self) -> Vec<ProductId> {
        let guard = self.inner.read().unwrap_or_else(|e| e.into_inner());
        guard.as_ref().map(|s| s.ids.clone()).unwrap_or_default()
    }
}
