pub mod index_artifact;
pub mod profile;
pub mod search;
