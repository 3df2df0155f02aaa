//! kindred - local driver for the matchmaking engine.
//!
//! Wires the engine to a fixture-backed social graph and a line-based stdin
//! transport. Real deployments swap both seams for their own collaborators.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use miette::{IntoDiagnostic, Result};
use tracing::info;

use kindred_core::db::migration::MigrationRunner;
use kindred_core::{
    CandidateSource, ConversationEngine, DecisionStore, KindredConfig, ProfileRegistry, UserId,
};

mod fixture;
mod output;
mod repl;

use fixture::FixtureGraph;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file (defaults to the standard locations)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Candidate dataset backing the social graph
    #[arg(short, long, default_value = "candidates.json")]
    data: PathBuf,

    /// User id this terminal session acts as
    #[arg(short, long, default_value = "local")]
    user: String,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let filter = if args.debug { "debug" } else { "info" };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = match &args.config {
        Some(path) => KindredConfig::load(path)?,
        None => KindredConfig::discover()?,
    };

    let db = kindred_core::db::connect(&config.database).await?;
    MigrationRunner::run(&db).await?;

    let decisions = DecisionStore::new(db.clone());
    let profiles = ProfileRegistry::new(db);
    let graph = Arc::new(FixtureGraph::load(&args.data)?);
    let source = CandidateSource::new(
        graph,
        decisions.clone(),
        config.search.page_size,
        config.search.upstream_timeout(),
    );
    let engine = ConversationEngine::new(source, decisions, profiles, config.search.photo_limit);

    info!(user = %args.user, "kindred ready, type 'help' for commands");
    repl::run(&engine, UserId::new(args.user)).await.into_diagnostic()?;

    info!("bye");
    Ok(())
}
