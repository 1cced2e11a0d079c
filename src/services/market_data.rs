//! Market data acquisition: one listing call per run, ranked and truncated
//! to the configured top-N, enriched with derived metrics.

use chrono::{NaiveDateTime, Utc};
use reqwest::Client;

use crate::error::PipelineError;
use crate::services::metrics::{self, CoinMarket, EnrichedRecord};

#[derive(Clone)]
pub struct MarketDataService {
    client: Client,
    api_key: String,
    base_url: String,
}

impl MarketDataService {
    pub fn new(api_key: String, base_url: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url,
        }
    }

    /// Fetch the currency-denominated market listing and return the enriched
    /// top `limit` records. Performs exactly one attempt; the orchestrator
    /// owns any retry policy.
    pub async fn fetch_top(&self, limit: usize) -> Result<Vec<EnrichedRecord>, PipelineError> {
        tracing::info!("Fetching market listing from {}", self.base_url);

        let url = format!("{}/coins/markets", self.base_url);

        let response = self
            .client
            .get(&url)
            .header("accept", "application/json")
            .header("x-cg-api-key", &self.api_key)
            .query(&[("vs_currency", "usd")])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await?;
            return Err(PipelineError::Upstream { status, body });
        }

        let coins: Vec<CoinMarket> = response.json().await?;

        if coins.is_empty() {
            tracing::warn!("Provider returned an empty market listing");
        } else {
            tracing::info!("Fetched {} assets from provider", coins.len());
        }

        // One stamp for the whole batch, captured before enrichment so every
        // record in the run shares it.
        let fetched_at = Utc::now().naive_utc();

        Ok(rank_and_enrich(coins, limit, fetched_at))
    }
}

/// Rank by market cap descending (absent caps count as zero), truncate to
/// `limit`, and enrich. The sort is stable, so ties keep the provider's
/// original order.
pub fn rank_and_enrich(
    mut coins: Vec<CoinMarket>,
    limit: usize,
    fetched_at: NaiveDateTime,
) -> Vec<EnrichedRecord> {
    coins.sort_by(|a, b| {
        b.market_cap
            .unwrap_or(0.0)
            .total_cmp(&a.market_cap.unwrap_or(0.0))
    });
    coins.truncate(limit);

    coins
        .iter()
        .map(|coin| metrics::enrich(coin, fetched_at))
        .collect()
}
