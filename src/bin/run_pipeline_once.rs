//! One-shot pipeline invocation for manual or cron-style use: fetch the top
//! assets, replace the snapshot, render and publish the chart, then exit.

use sea_orm::Database;
use sea_orm_migration::MigratorTrait;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use coinpulse_etl::config::Config;
use coinpulse_etl::services::{market_data::MarketDataService, pipeline::PipelineOrchestrator};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    let db = Database::connect(&config.database_url).await?;
    migration::Migrator::up(&db, None).await?;

    let market = MarketDataService::new(config.api_key.clone(), config.api_url.clone());
    let orchestrator = PipelineOrchestrator::new(db, market, &config);

    let result = orchestrator.run().await?;

    tracing::info!(
        outcome = ?result.outcome,
        record_count = result.record_count,
        published = result.published,
        "Pipeline run finished"
    );

    Ok(())
}
