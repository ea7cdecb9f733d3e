pub mod catalog;
pub mod embedder;
pub mod index_sync;
pub mod load;
pub mod search;
pub mod stats;
