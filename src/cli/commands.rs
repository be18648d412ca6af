use crate::domain::entities::search::{DEFAULT_RESULTS, DEFAULT_THRESHOLD};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "profilematch", about = "Semantic profile matching")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Find profiles matching a free-text query
    Search {
        query: String,
        /// Number of results (1-20)
        #[arg(long, short, default_value_t = DEFAULT_RESULTS)]
        k: usize,
        /// Profile id to leave out, usually the person searching
        #[arg(long)]
        exclude: Option<i64>,
        /// Minimum cosine similarity (0.0-1.0)
        #[arg(long, default_value_t = DEFAULT_THRESHOLD)]
        threshold: f64,
    },
    /// Report service readiness
    Health,
    /// List cached profiles
    Users,
    /// Embed every profile and write the index artifact
    BuildIndex {
        /// Embed the weighted profile document instead of bio and conversations
        #[arg(long)]
        enriched: bool,
    },
}
