pub mod embedding_port;
pub mod index_store;
pub mod profile_source;
pub mod vector_index;
