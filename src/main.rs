use catalog_search::api;
use catalog_search::cli::commands::{Cli, Commands};
use catalog_search::config::CatalogConfig;
use catalog_search::domain::entities::product::{NewProduct, ProductPatch};
use catalog_search::domain::values::page::Page;
use catalog_search::domain::values::product_id::ProductId;
use catalog_search::Catalog;
use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();

    let config = match CatalogConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error reading configuration: {e}");
            std::process::exit(1);
        }
    };

    let catalog = match Catalog::open(&config).await {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error initializing catalog: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = run_command(catalog, &config, cli.command).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

/// Logs go to stderr so command output on stdout stays machine-readable.
/// `RUST_LOG` overrides the level; `CATALOG_LOG_FORMAT=json` switches format.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    let json = std::env::var("CATALOG_LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));
    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}

async fn run_command(
    catalog: Catalog,
    config: &CatalogConfig,
    cmd: Commands,
) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        Commands::Serve { bind } => {
            let bind = bind.unwrap_or_else(|| config.bind.clone());
            api::serve(Arc::new(catalog), &bind).await?;
        }
        Commands::List { skip, limit } => {
            let products = catalog.list(Page::new(skip, limit)?)?;
            println!("{}", serde_json::to_string_pretty(&products)?);
        }
        Commands::Get { id } => {
            let product = catalog.get(ProductId::new(id))?;
            println!("{}", serde_json::to_string_pretty(&product)?);
        }
        Commands::Add { json } => {
            let input: NewProduct = serde_json::from_str(&json)?;
            let product = catalog.create(input).await?;
            println!("{}", serde_json::to_string_pretty(&product)?);
        }
        Commands::Update { id, json } => {
            let patch: ProductPatch = serde_json::from_str(&json)?;
            let product = catalog.update(ProductId::new(id), patch).await?;
            println!("{}", serde_json::to_string_pretty(&product)?);
        }
        Commands::Delete { id } => {
            let product = catalog.delete(ProductId::new(id)).await?;
            println!("{}", serde_json::to_string_pretty(&product)?);
        }
        Commands::Search {
            query,
            top_k,
            scores,
        } => {
            if scores {
                let hits = catalog.neighbors(&query, top_k).await?;
                println!("{}", serde_json::to_string_pretty(&hits)?);
            } else {
                let products = catalog.search(&query, top_k).await?;
                println!("{}", serde_json::to_string_pretty(&products)?);
            }
        }
        Commands::Load { path, force } => {
            let outcome = catalog.load(&path, force).await?;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
        Commands::Reindex => {
            let count = catalog.reindex().await?;
            println!("Reindexed {count} products");
        }
        Commands::Stats => {
            let stats = catalog.stats()?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
    }
    Ok(())
}
