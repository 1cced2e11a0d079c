//! Structured error types for the snapshot pipeline.
//!
//! Faults in the fetch and store steps are fatal to a run; chart and publish
//! faults are downgraded by the orchestrator to a partial success.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("market data API error {status}: {body}")]
    Upstream {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("market data request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("database error: {0}")]
    Persistence(#[from] sea_orm::DbErr),

    #[error("value {0} cannot be represented as a decimal")]
    Numeric(f64),

    #[error("chart rendering failed: {0}")]
    Render(String),

    #[error("failed to publish chart: {0}")]
    Publish(std::io::Error),
}

impl PipelineError {
    /// Whether the orchestrator treats this fault as fatal to the run.
    /// Render and publish faults degrade to partial success instead.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Render(_) | Self::Publish(_))
    }
}
