//! `SeaORM` Entity for the coingecko snapshot table

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "coingecko")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub symbol: String,
    pub name: String,
    pub current_price: Decimal,
    pub market_cap: Decimal,
    pub total_volume: Decimal,
    pub high_24h: Decimal,
    pub low_24h: Decimal,
    pub price_change_percentage_24h: Option<Decimal>,
    pub total_supply: Option<Decimal>,
    pub volume_marketcap_ratio: Option<Decimal>,
    pub volatility: Option<Decimal>,
    pub fetched_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
