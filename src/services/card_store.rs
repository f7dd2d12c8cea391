//! Durable store for tracked cards and their marketplace listings
//!
//! All write operations are idempotent upserts. Storage errors are caught
//! here, logged, and surfaced as `bool` so one failed write never aborts a
//! surrounding ingestion batch.

use chrono::{DateTime, Utc};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, Order, QueryFilter, QueryOrder, Set,
};
use sea_orm_migration::MigratorTrait;
use sha2::{Digest, Sha256};
use std::collections::HashMap;

use crate::entities::{cards, listings, prelude::*};
use crate::marketplace::REFERENCE_CURRENCY;

/// Deterministic card id: hex digest of the canonical card name, so
/// re-discovering the same name never creates a duplicate card.
pub fn card_id_for_name(name: &str) -> String {
    hex::encode(Sha256::digest(name.as_bytes()))
}

#[derive(Clone)]
pub struct CardStore {
    db: DatabaseConnection,
}

impl CardStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates the schema if absent. Safe to call on every process start.
    pub async fn initialize(&self) -> Result<(), DbErr> {
        migration::Migrator::up(&self.db, None).await
    }

    /// Insert or replace a card, refreshing `updated_at`.
    pub async fn upsert_card(&self, card_id: &str, card_name: &str) -> bool {
        let model = cards::ActiveModel {
            id: Set(card_id.to_string()),
            name: Set(card_name.to_string()),
            updated_at: Set(Some(Utc::now())),
            ..Default::default()
        };

        let result = Cards::insert(model)
            .on_conflict(
                OnConflict::column(cards::Column::Id)
                    .update_columns([cards::Column::Name, cards::Column::UpdatedAt])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await;

        match result {
            Ok(_) => true,
            Err(e) => {
                tracing::error!(card_id = %card_id, error = %e, "Error adding card");
                false
            }
        }
    }

    /// Insert or replace a listing by its marketplace id. Does not verify
    /// that `card_id` exists; in the ingestion pipeline the card is always
    /// upserted first.
    pub async fn upsert_listing(
        &self,
        listing_id: &str,
        card_id: &str,
        title: &str,
        condition: &str,
        price: f64,
        listing_date: DateTime<Utc>,
    ) -> bool {
        let model = listings::ActiveModel {
            id: Set(listing_id.to_string()),
            card_id: Set(card_id.to_string()),
            title: Set(title.to_string()),
            condition_text: Set(condition.to_string()),
            price: Set(price),
            currency: Set(REFERENCE_CURRENCY.to_string()),
            listing_date: Set(listing_date),
            ..Default::default()
        };

        let result = Listings::insert(model)
            .on_conflict(
                OnConflict::column(listings::Column::Id)
                    .update_columns([
                        listings::Column::CardId,
                        listings::Column::Title,
                        listings::Column::ConditionText,
                        listings::Column::Price,
                        listings::Column::Currency,
                        listings::Column::ListingDate,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await;

        match result {
            Ok(_) => true,
            Err(e) => {
                tracing::error!(listing_id = %listing_id, error = %e, "Error adding listing");
                false
            }
        }
    }

    /// Snapshot of all tracked cards as `{id: name}`.
    pub async fn all_cards(&self) -> Result<HashMap<String, String>, DbErr> {
        let rows = Cards::find().all(&self.db).await?;
        Ok(rows.into_iter().map(|c| (c.id, c.name)).collect())
    }

    pub async fn card_exists(&self, card_id: &str) -> Result<bool, DbErr> {
        Ok(Cards::find_by_id(card_id).one(&self.db).await?.is_some())
    }

    /// Raw `(price, listing_date)` rows for one card, newest first. A card
    /// with no listings yields an empty vec, not an error.
    pub async fn listings_for_card(
        &self,
        card_id: &str,
    ) -> Result<Vec<(f64, DateTime<Utc>)>, DbErr> {
        let rows = Listings::find()
            .filter(listings::Column::CardId.eq(card_id))
            .filter(listings::Column::Currency.eq(REFERENCE_CURRENCY))
            .order_by(listings::Column::ListingDate, Order::Desc)
            .all(&self.db)
            .await?;

        Ok(rows.into_iter().map(|l| (l.price, l.listing_date)).collect())
    }
}
