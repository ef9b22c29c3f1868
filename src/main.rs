use clap::Parser;
use dotenv::dotenv;
use tracing_subscriber::EnvFilter;
use divines_api::config::Config;
use divines_api::controller::{self, AppState};
use divines_api::repositories::Database;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::parse();
    let database = Database::connect(&config).await;

    controller::serve(AppState::new(database, config)).await
}
