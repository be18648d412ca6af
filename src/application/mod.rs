pub mod build_index;
pub mod expansion;
pub mod explanation;
pub mod health;
pub mod keywords;
pub mod matching;
pub mod profile_cache;
pub mod ranking;
pub mod search;
