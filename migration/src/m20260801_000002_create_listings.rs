use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Listings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Listings::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Listings::CardId).string().not_null())
                    .col(ColumnDef::new(Listings::Title).string().not_null())
                    .col(ColumnDef::new(Listings::ConditionText).string().not_null())
                    .col(ColumnDef::new(Listings::Price).double().not_null())
                    .col(
                        ColumnDef::new(Listings::Currency)
                            .string()
                            .not_null()
                            .default("USD"),
                    )
                    .col(
                        ColumnDef::new(Listings::ListingDate)
                            .timestamp()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Listings::CreatedAt)
                            .timestamp()
                            .default(SimpleExpr::Keyword(Keyword::CurrentTimestamp)),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_listings_card_id")
                            .from(Listings::Table, Listings::CardId)
                            .to(Cards::Table, Cards::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Index for per-card listing scans
        manager
            .create_index(
                Index::create()
                    .name("idx_listings_card_id")
                    .table(Listings::Table)
                    .col(Listings::CardId)
                    .to_owned(),
            )
            .await?;

        // Index for time-window queries
        manager
            .create_index(
                Index::create()
                    .name("idx_listings_listing_date")
                    .table(Listings::Table)
                    .col(Listings::ListingDate)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Listings::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Listings {
    Table,
    Id,
    CardId,
    Title,
    ConditionText,
    Price,
    Currency,
    ListingDate,
    CreatedAt,
}

#[derive(Iden)]
enum Cards {
    Table,
    Id,
}
