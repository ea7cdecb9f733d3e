use serde::Serialize;

pub const DEFAULT_LIMIT: usize = 10;
pub const MAX_LIMIT: usize = 100;

/// Offset pagination for product listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Page {
    skip: usize,
    limit: usize,
}

impl Page {
    pub fn new(skip: usize, limit: usize) -> Result<Self, String> {
        if !(1..=MAX_LIMIT).contains(&limit) {
            return Err(format!("limit must be between 1 and {MAX_LIMIT}, got {limit}"));
        }
        Ok(Page { skip, limit })
    }

    pub fn skip(&self) -> usize {
        self.skip
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}

impl Default for Page {
    fn default() -> Self {
        Page {
            skip: 0,
            limit: DEFAULT_LIMIT,
        }
    }
}
