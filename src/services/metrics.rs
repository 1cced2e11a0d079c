//! Derived-metric computation for raw market records.
//!
//! Pure functions only, no I/O. Missing or zero denominators yield null
//! derived fields instead of faulting.

use chrono::NaiveDateTime;
use serde::Deserialize;

/// One asset entry as returned by the provider's market listing. Numeric
/// fields may be absent or null; defaults are applied during enrichment.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CoinMarket {
    pub symbol: String,
    pub name: Option<String>,
    pub current_price: Option<f64>,
    pub market_cap: Option<f64>,
    pub total_volume: Option<f64>,
    pub high_24h: Option<f64>,
    pub low_24h: Option<f64>,
    pub price_change_percentage_24h: Option<f64>,
    pub total_supply: Option<f64>,
}

/// A persisted snapshot row: the raw fields with defaults applied, plus the
/// derived metrics and the shared batch stamp.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedRecord {
    pub symbol: String,
    pub name: String,
    pub current_price: f64,
    pub market_cap: f64,
    pub total_volume: f64,
    pub high_24h: f64,
    pub low_24h: f64,
    pub price_change_percentage_24h: Option<f64>,
    pub total_supply: Option<f64>,
    pub volume_marketcap_ratio: Option<f64>,
    pub volatility: Option<f64>,
    pub fetched_at: NaiveDateTime,
}

/// Enrich one raw record. Total over all inputs:
/// - `volume_marketcap_ratio` is defined only when `market_cap > 0`;
/// - `volatility` is defined only when `current_price > 0`. An absent price
///   defaults to 1, but a price that is genuinely zero stays zero and yields
///   a null volatility.
pub fn enrich(coin: &CoinMarket, fetched_at: NaiveDateTime) -> EnrichedRecord {
    let market_cap = coin.market_cap.unwrap_or(0.0);
    let total_volume = coin.total_volume.unwrap_or(0.0);
    let current_price = coin.current_price.unwrap_or(1.0);
    let high_24h = coin.high_24h.unwrap_or(0.0);
    let low_24h = coin.low_24h.unwrap_or(0.0);

    let volume_marketcap_ratio = if market_cap > 0.0 {
        Some(total_volume / market_cap)
    } else {
        None
    };

    let volatility = if current_price > 0.0 {
        Some((high_24h - low_24h) * 100.0 / current_price)
    } else {
        None
    };

    EnrichedRecord {
        symbol: coin.symbol.clone(),
        name: coin.name.clone().unwrap_or_default(),
        current_price,
        market_cap,
        total_volume,
        high_24h,
        low_24h,
        price_change_percentage_24h: coin.price_change_percentage_24h,
        total_supply: coin.total_supply,
        volume_marketcap_ratio,
        volatility,
        fetched_at,
    }
}
