pub mod page;
pub mod product_id;
pub mod top_k;
