use serde::Serialize;
use std::fmt;

pub const MIN_TOP_K: usize = 1;
pub const DEFAULT_MAX_TOP_K: usize = 20;
pub const DEFAULT_TOP_K: usize = 5;

/// Number of search results requested, validated against `1..=max`.
/// Out-of-range values are rejected rather than clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TopK(usize);

impl TopK {
    pub fn new(value: usize, max: usize) -> Result<Self, String> {
        if !(MIN_TOP_K..=max).contains(&value) {
            return Err(format!(
                "top_k must be between {MIN_TOP_K} and {max}, got {value}"
            ));
        }
        Ok(TopK(value))
    }

    pub fn value(&self) -> usize {
        self.0
    }
}

impl fmt::Display for TopK {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
