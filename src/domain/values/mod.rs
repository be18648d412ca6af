pub mod activity_status;
pub mod current_role;
pub mod document_mode;
pub mod experience_level;
pub mod match_strictness;
pub mod networking_intent;
pub mod pivot_status;
pub mod similarity;
pub mod skill_level;
pub mod user_status;
