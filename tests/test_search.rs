mod common;

use catalog_search::config::SearchLimits;
use catalog_search::domain::entities::product::ProductPatch;
use catalog_search::domain::error::DomainError;
use catalog_search::domain::values::product_id::ProductId;
use catalog_search::infrastructure::embeddings::hashing::HashingProvider;
use catalog_search::Catalog;
use common::{product, seed, setup};
use std::sync::Arc;

fn ids(raw: &[i64]) -> Vec<ProductId> {
    raw.iter().copied().map(ProductId::new).collect()
}

#[tokio::test]
async fn test_closest_product_ranks_first() {
    let catalog = setup().await;
    seed(&catalog, &["red shoe", "blue hat"]).await;

    let found = catalog.search_ids("red sneaker", Some(1)).await.unwrap();
    assert_eq!(found, ids(&[1]));
}

#[tokio::test]
async fn test_created_product_searchable_without_rebuild() {
    let catalog = setup().await;
    seed(&catalog, &["red shoe", "blue hat"]).await;

    let green = catalog.create(product("green shoe")).await.unwrap();
    assert_eq!(green.id, ProductId::new(3));
    assert_eq!(catalog.indexed_ids(), ids(&[1, 2, 3]));

    let found = catalog.search_ids("shoe", Some(2)).await.unwrap();
    assert_eq!(found, ids(&[1, 3]));
}

#[tokio::test]
async fn test_deleted_product_never_returned() {
    let catalog = setup().await;
    seed(&catalog, &["red shoe", "blue hat", "green shoe"]).await;

    catalog.delete(ProductId::new(1)).await.unwrap();
    assert_eq!(catalog.indexed_ids(), ids(&[2, 3]));

    let found = catalog.search_ids("red shoe", Some(20)).await.unwrap();
    assert!(!found.contains(&ProductId::new(1)));
    assert_eq!(found.len(), 2);
}

#[tokio::test]
async fn test_updated_text_moves_product_up() {
    let catalog = setup().await;
    seed(&catalog, &["red shoe", "blue hat", "green shoe", "red scarf"]).await;
    let hat = ProductId::new(2);

    let before = catalog.neighbors("red", Some(4)).await.unwrap();
    let rank_before = before.iter().position(|n| n.id == hat).unwrap();
    let dist_before = before[rank_before].distance;

    let patch = ProductPatch {
        name: Some("red boot".into()),
        ..Default::default()
    };
    catalog.update(hat, patch).await.unwrap();

    let after = catalog.neighbors("red", Some(4)).await.unwrap();
    let rank_after = after.iter().position(|n| n.id == hat).unwrap();
    assert!(rank_after < rank_before);
    assert!(after[rank_after].distance < dist_before);
    assert_eq!(
        after.iter().map(|n| n.id).collect::<Vec<_>>(),
        ids(&[1, 2, 4, 3])
    );
}

#[tokio::test]
async fn test_results_follow_index_order() {
    let catalog = setup().await;
    seed(&catalog, &["wool scarf", "leather boot", "wool hat", "rain jacket"]).await;

    for query in ["wool", "boot", "wool hat", "jacket rain"] {
        let ranked = catalog.search_ids(query, Some(4)).await.unwrap();
        let products = catalog.search(query, Some(4)).await.unwrap();
        let resolved: Vec<_> = products.iter().map(|p| p.id).collect();
        assert_eq!(resolved, ranked, "query {query}");
    }
}

#[tokio::test]
async fn test_empty_catalog_returns_nothing() {
    let catalog = setup().await;
    for top_k in [1, 5, 20] {
        assert!(catalog.search("anything", Some(top_k)).await.unwrap().is_empty());
    }
    assert!(catalog.search("", None).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_search_after_last_product_deleted() {
    let catalog = setup().await;
    let only = catalog.create(product("desk lamp")).await.unwrap();
    catalog.delete(only.id).await.unwrap();

    assert_eq!(catalog.stats().unwrap().indexed, 0);
    assert_eq!(catalog.stats().unwrap().dimension, None);
    assert!(catalog.search("lamp", Some(3)).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_top_k_beyond_catalog_size_returns_all() {
    let catalog = setup().await;
    seed(&catalog, &["coffee mug", "desk lamp", "trail shoe"]).await;

    let found = catalog.search("mug", Some(20)).await.unwrap();
    assert_eq!(found.len(), 3);
    assert_eq!(found[0].name, "coffee mug");
}

#[tokio::test]
async fn test_top_k_out_of_range_rejected() {
    let catalog = setup().await;
    seed(&catalog, &["coffee mug"]).await;

    for bad in [0, 21, 100] {
        let err = catalog.search("mug", Some(bad)).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)), "top_k {bad}");
    }
}

#[tokio::test]
async fn test_default_top_k() {
    let catalog = setup().await;
    let names: Vec<String> = (0..8).map(|i| format!("mug {i}")).collect();
    let refs: Vec<&str> = names.iter().map(String::as_str).collect();
    seed(&catalog, &refs).await;

    assert_eq!(catalog.search("mug", None).await.unwrap().len(), 5);
}

#[tokio::test]
async fn test_large_top_k_resolves_every_hit() {
    let limits = SearchLimits::new(5000, 5).unwrap();
    let catalog = Catalog::with_provider(":memory:", Arc::new(HashingProvider::default()), limits)
        .await
        .unwrap();
    let rows: Vec<serde_json::Value> = (0..2100)
        .map(|i| {
            serde_json::json!({
                "name": format!("item {i}"),
                "description": "",
                "price": 1.0,
                "categories": ""
            })
        })
        .collect();
    catalog
        .load_json(&serde_json::to_string(&rows).unwrap(), false)
        .await
        .unwrap();

    let found = catalog.search("item", Some(2100)).await.unwrap();
    assert_eq!(found.len(), 2100);
    let ranked = catalog.search_ids("item", Some(2100)).await.unwrap();
    let resolved: Vec<_> = found.iter().map(|p| p.id).collect();
    assert_eq!(resolved, ranked);
}
