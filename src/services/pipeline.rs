//! Run orchestration: fetch, store, chart, publish.
//!
//! Fetch and store faults abort the run. Chart and publish faults are logged
//! and degrade the result to a partial success, leaving the previously
//! published artifact in place.

use std::path::{Path, PathBuf};

use chrono::TimeDelta;
use sea_orm::DatabaseConnection;

use crate::config::Config;
use crate::error::PipelineError;
use crate::services::{chart, market_data::MarketDataService, snapshot};

/// Name of the artifact inside the static-serving directory.
pub const PUBLISHED_FILE: &str = "index.html";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// A fresh batch was stored.
    Completed,
    /// The provider returned no records; the previous snapshot was kept.
    SkippedEmpty,
}

#[derive(Debug)]
pub struct RunResult {
    pub outcome: RunOutcome,
    pub record_count: usize,
    pub artifact_path: Option<PathBuf>,
    pub published: bool,
}

#[derive(Clone)]
pub struct PipelineOrchestrator {
    db: DatabaseConnection,
    market: MarketDataService,
    top_limit: usize,
    lookback_hours: i64,
    chart_path: PathBuf,
    public_dir: PathBuf,
}

impl PipelineOrchestrator {
    pub fn new(db: DatabaseConnection, market: MarketDataService, config: &Config) -> Self {
        Self {
            db,
            market,
            top_limit: config.top_limit,
            lookback_hours: config.lookback_hours,
            chart_path: config.chart_path.clone(),
            public_dir: config.public_dir.clone(),
        }
    }

    /// Where the published artifact lives; the readiness probe checks this.
    pub fn published_path(&self) -> PathBuf {
        self.public_dir.join(PUBLISHED_FILE)
    }

    /// Execute one full run.
    pub async fn run(&self) -> Result<RunResult, PipelineError> {
        tracing::info!("Fetching top {} assets", self.top_limit);
        let records = self.market.fetch_top(self.top_limit).await?;

        let outcome = if records.is_empty() {
            tracing::warn!("No records fetched; keeping the previous snapshot");
            RunOutcome::SkippedEmpty
        } else {
            snapshot::replace(&self.db, &records).await?;
            RunOutcome::Completed
        };

        // Chart against whatever the store now holds: the fresh batch, or
        // the previous one when the fetch came back empty.
        let artifact_path = match chart::build(
            &self.db,
            TimeDelta::hours(self.lookback_hours),
            &self.chart_path,
        )
        .await
        {
            Ok(path) => path,
            Err(e) => {
                tracing::error!("Chart step failed, continuing without artifact: {}", e);
                None
            }
        };

        let published = match &artifact_path {
            Some(path) => match self.publish(path).await {
                Ok(dest) => {
                    tracing::info!("Chart published to {}", dest.display());
                    true
                }
                Err(e) => {
                    tracing::error!("Publish step failed, previous artifact stays: {}", e);
                    false
                }
            },
            None => false,
        };

        Ok(RunResult {
            outcome,
            record_count: records.len(),
            artifact_path,
            published,
        })
    }

    /// Copy the rendered artifact into the static-serving directory under
    /// its fixed published name.
    async fn publish(&self, artifact: &Path) -> Result<PathBuf, PipelineError> {
        tokio::fs::create_dir_all(&self.public_dir)
            .await
            .map_err(PipelineError::Publish)?;

        let dest = self.published_path();
        tokio::fs::copy(artifact, &dest)
            .await
            .map_err(PipelineError::Publish)?;

        Ok(dest)
    }
}
