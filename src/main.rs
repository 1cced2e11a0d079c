use axum::{Router, routing::get};
use sea_orm::Database;
use sea_orm_migration::MigratorTrait;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use coinpulse_etl::AppState;
use coinpulse_etl::config::Config;
use coinpulse_etl::handlers;
use coinpulse_etl::jobs::snapshot_sync::start_snapshot_sync_job;
use coinpulse_etl::services::{
    market_data::MarketDataService, pipeline::PipelineOrchestrator, run_controller::RunController,
};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,coinpulse_etl=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    // Connect to database
    tracing::info!("Connecting to database...");
    let db = Database::connect(&config.database_url)
        .await
        .expect("Failed to connect to database");

    // Run migrations
    tracing::info!("Running migrations...");
    migration::Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    let market = MarketDataService::new(config.api_key.clone(), config.api_url.clone());
    let orchestrator = PipelineOrchestrator::new(db.clone(), market, &config);
    let controller = RunController::new(orchestrator);

    // Scheduled runs share the single-flight controller with /run
    start_snapshot_sync_job(controller.clone(), config.sync_interval_secs).await;

    let state = AppState { db, controller };

    // Build router
    let app = Router::new()
        .route("/", get(handlers::pipeline::root))
        .route("/run", get(handlers::pipeline::trigger_run))
        .route("/status", get(handlers::pipeline::run_status))
        .route("/chart", get(handlers::pipeline::latest_chart))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port))
        .await
        .unwrap();

    tracing::info!("Server listening on {}", listener.local_addr().unwrap());

    axum::serve(listener, app).await.unwrap();
}
