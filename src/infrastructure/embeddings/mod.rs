pub mod hashing;
#[cfg(feature = "fastembed")]
pub mod minilm;
pub mod noop;
pub mod remote;
