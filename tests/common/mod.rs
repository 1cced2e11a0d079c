use sea_orm::{Database, DatabaseConnection, DbErr};
use std::env;

/// Set up test database connection
/// Uses TEST_DATABASE_URL environment variable or falls back to default
#[allow(dead_code)]
pub async fn setup_test_db() -> Result<DatabaseConnection, DbErr> {
    let database_url = env::var("TEST_DATABASE_URL").unwrap_or_else(|_| {
        "postgresql://coinpulse_user@localhost:5432/coinpulse_test".to_string()
    });

    Database::connect(&database_url).await
}
