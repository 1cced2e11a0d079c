// src/lib.rs

use sea_orm::DatabaseConnection;
use services::run_controller::RunController;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub controller: RunController,
}

pub mod config;
pub mod error;

pub mod entities {
    pub mod prelude;

    pub mod coingecko;
}

pub mod services {
    pub mod chart;
    pub mod market_data;
    pub mod metrics;
    pub mod pipeline;
    pub mod run_controller;
    pub mod snapshot;
}

pub mod jobs {
    pub mod snapshot_sync;
}

pub mod models;
pub mod handlers;
