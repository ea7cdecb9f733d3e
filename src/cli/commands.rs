use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "catalog-search", about = "Product catalog with semantic search")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP API
    Serve {
        /// Address to bind (host:port)
        #[arg(long, env = "CATALOG_BIND")]
        bind: Option<String>,
    },
    /// List products
    List {
        #[arg(long, default_value = "0")]
        skip: usize,
        #[arg(long, default_value = "10")]
        limit: usize,
    },
    /// Show one product
    Get { id: i64 },
    /// Add a product
    Add {
        /// JSON with name, description, price, categories, rating, brand
        json: String,
    },
    /// Update fields of a product
    Update {
        id: i64,
        /// JSON with any of name, description, price, categories, rating, brand
        json: String,
    },
    /// Delete a product
    Delete { id: i64 },
    /// Semantic (vector) search
    Search {
        query: String,
        #[arg(long)]
        top_k: Option<usize>,
        /// Print ids with distances instead of full products
        #[arg(long)]
        scores: bool,
    },
    /// Bulk load products from a CSV file or a JSON array file
    Load {
        path: PathBuf,
        /// Import even if the store already has products
        #[arg(long)]
        force: bool,
    },
    /// Rebuild the vector index from the store
    Reindex,
    /// Show catalog and index statistics
    Stats,
}
