use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Coingecko::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Coingecko::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Coingecko::Symbol)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Coingecko::Name)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Coingecko::CurrentPrice)
                            .decimal()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Coingecko::MarketCap)
                            .decimal()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Coingecko::TotalVolume)
                            .decimal()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Coingecko::High24h)
                            .decimal()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Coingecko::Low24h)
                            .decimal()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Coingecko::PriceChangePercentage24h)
                            .decimal(),
                    )
                    .col(
                        ColumnDef::new(Coingecko::TotalSupply)
                            .decimal(),
                    )
                    .col(
                        ColumnDef::new(Coingecko::VolumeMarketcapRatio)
                            .decimal(),
                    )
                    .col(
                        ColumnDef::new(Coingecko::Volatility)
                            .decimal(),
                    )
                    .col(
                        ColumnDef::new(Coingecko::FetchedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Index for the chart look-back filter (fetched_at > now - window)
        manager
            .create_index(
                Index::create()
                    .name("idx_coingecko_fetched_at")
                    .table(Coingecko::Table)
                    .col(Coingecko::FetchedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Coingecko::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Coingecko {
    Table,
    Id,
    Symbol,
    Name,
    CurrentPrice,
    MarketCap,
    TotalVolume,
    High24h,
    Low24h,
    PriceChangePercentage24h,
    TotalSupply,
    VolumeMarketcapRatio,
    Volatility,
    FetchedAt,
}
