use anyhow::{Context, Result};
use guessterm::cli;
use guessterm::store::ScoreStore;

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional; the variable itself is not.
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let database_url = std::env::var("DATABASE_URL")
        .context("DATABASE_URL is not set (try DATABASE_URL=sqlite:scores.db)")?;
    let store = ScoreStore::connect(&database_url).await?;

    cli::run_cli(&store).await
}
