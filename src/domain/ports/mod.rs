pub mod embedding_port;
pub mod product_repository;
pub mod vector_index;
