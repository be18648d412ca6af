use clap::Parser;
use profilematch::cli::commands::{Cli, Commands};
use profilematch::config::MatcherConfig;
use profilematch::domain::values::document_mode::DocumentMode;
use profilematch::ProfileMatcher;
use serde::Serialize;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();

    let config = match MatcherConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            std::process::exit(1);
        }
    };

    if let Err(e) = run_command(&config, cli.command).await {
        error!(error = %e, "command failed");
        std::process::exit(1);
    }
}

/// Logs go to stderr so stdout carries only JSON.
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init();
}

async fn run_command(config: &MatcherConfig, cmd: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        Commands::Search {
            query,
            k,
            exclude,
            threshold,
        } => {
            let matcher = ProfileMatcher::start(config).await?;
            let response = matcher.search(&query, k, exclude, threshold).await?;
            print_json(&response)?;
        }
        Commands::Health => {
            let matcher = ProfileMatcher::start(config).await?;
            print_json(&matcher.health())?;
        }
        Commands::Users => {
            let matcher = ProfileMatcher::start(config).await?;
            print_json(&matcher.users())?;
        }
        Commands::BuildIndex { enriched } => {
            let mode = if enriched {
                DocumentMode::Enriched
            } else {
                DocumentMode::Plain
            };
            let report = ProfileMatcher::build_index(config, mode).await?;
            print_json(&report)?;
        }
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
