//! Snapshot replacement over the coingecko table.
//!
//! Each run fully replaces the persisted set; there is no merge path. The
//! delete and bulk insert run in one transaction, so a fault between the two
//! phases rolls back and the previous snapshot stays intact.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set, TransactionTrait};

use crate::entities::{coingecko, prelude::*};
use crate::error::PipelineError;
use crate::services::metrics::EnrichedRecord;

/// Delete all existing rows, then bulk-insert `records`. An empty batch
/// still clears the table; callers that want to keep prior data on an empty
/// fetch must skip the call entirely.
pub async fn replace(
    db: &DatabaseConnection,
    records: &[EnrichedRecord],
) -> Result<usize, PipelineError> {
    let models: Vec<coingecko::ActiveModel> = records
        .iter()
        .map(to_active_model)
        .collect::<Result<_, _>>()?;

    tracing::info!("Deleting existing snapshot rows");
    let txn = db.begin().await?;
    Coingecko::delete_many().exec(&txn).await?;

    if !models.is_empty() {
        Coingecko::insert_many(models).exec(&txn).await?;
    }
    txn.commit().await?;

    tracing::info!("Inserted {} snapshot records", records.len());
    Ok(records.len())
}

/// All rows stamped after `since`; the chart's look-back select.
pub async fn rows_since(
    db: &DatabaseConnection,
    since: NaiveDateTime,
) -> Result<Vec<coingecko::Model>, PipelineError> {
    let rows = Coingecko::find()
        .filter(coingecko::Column::FetchedAt.gt(since))
        .all(db)
        .await?;

    Ok(rows)
}

fn to_active_model(record: &EnrichedRecord) -> Result<coingecko::ActiveModel, PipelineError> {
    Ok(coingecko::ActiveModel {
        symbol: Set(record.symbol.clone()),
        name: Set(record.name.clone()),
        current_price: Set(to_decimal(record.current_price)?),
        market_cap: Set(to_decimal(record.market_cap)?),
        total_volume: Set(to_decimal(record.total_volume)?),
        high_24h: Set(to_decimal(record.high_24h)?),
        low_24h: Set(to_decimal(record.low_24h)?),
        price_change_percentage_24h: Set(record
            .price_change_percentage_24h
            .map(to_decimal)
            .transpose()?),
        total_supply: Set(record.total_supply.map(to_decimal).transpose()?),
        volume_marketcap_ratio: Set(record
            .volume_marketcap_ratio
            .map(to_decimal)
            .transpose()?),
        volatility: Set(record.volatility.map(to_decimal).transpose()?),
        fetched_at: Set(record.fetched_at),
        ..Default::default()
    })
}

fn to_decimal(value: f64) -> Result<Decimal, PipelineError> {
    Decimal::from_f64_retain(value).ok_or(PipelineError::Numeric(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn record() -> EnrichedRecord {
        EnrichedRecord {
            symbol: "btc".to_string(),
            name: "Bitcoin".to_string(),
            current_price: 50_000.0,
            market_cap: 1_000_000.0,
            total_volume: 250_000.0,
            high_24h: 51_000.0,
            low_24h: 49_000.0,
            price_change_percentage_24h: Some(1.5),
            total_supply: None,
            volume_marketcap_ratio: Some(0.25),
            volatility: Some(4.0),
            fetched_at: NaiveDate::from_ymd_opt(2026, 8, 7)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
        }
    }

    #[test]
    fn test_active_model_maps_values_and_nulls() {
        let model = to_active_model(&record()).unwrap();

        assert_eq!(model.symbol.unwrap(), "btc");
        assert_eq!(model.current_price.unwrap(), dec!(50000));
        assert_eq!(model.volume_marketcap_ratio.unwrap(), Some(dec!(0.25)));
        assert_eq!(model.total_supply.unwrap(), None);
        assert_eq!(model.volatility.unwrap(), Some(dec!(4)));
    }

    #[test]
    fn test_non_finite_value_is_rejected() {
        let mut bad = record();
        bad.market_cap = f64::INFINITY;

        let err = to_active_model(&bad).unwrap_err();
        assert!(matches!(err, PipelineError::Numeric(_)));
    }
}
