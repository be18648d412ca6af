pub mod embeddings;
pub mod index;
pub mod profiles;
pub mod sqlite;
pub mod worker_pool;
