//! Rolling price averages over trailing time windows

use chrono::{Duration, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use sea_orm::DbErr;

use crate::models::averages::{CardAverages, Window, WindowStats};
use crate::services::card_store::CardStore;

pub struct AveragesService {
    store: CardStore,
}

impl AveragesService {
    pub fn new(store: CardStore) -> Self {
        Self { store }
    }

    /// Average listing price per trailing window, measured from the time of
    /// the call against each listing's marketplace creation date.
    ///
    /// Returns `Ok(None)` for a card id that was never tracked. A tracked
    /// card with no listings yet is a valid result with every window at
    /// average 0.0 / count 0.
    pub async fn averages_for(&self, card_id: &str) -> Result<Option<CardAverages>, DbErr> {
        if !self.store.card_exists(card_id).await? {
            return Ok(None);
        }

        let rows = self.store.listings_for_card(card_id).await?;
        let now = Utc::now();
        let cutoffs: Vec<_> = Window::ALL
            .iter()
            .map(|w| now - Duration::days(w.days()))
            .collect();

        let mut sums = [Decimal::ZERO; 3];
        let mut counts = [0u64; 3];

        for (price, listing_date) in rows {
            let price = Decimal::from_f64_retain(price).unwrap_or_default();
            for (i, cutoff) in cutoffs.iter().enumerate() {
                if listing_date >= *cutoff {
                    sums[i] += price;
                    counts[i] += 1;
                }
            }
        }

        let stats = |i: usize| {
            if counts[i] == 0 {
                WindowStats::empty()
            } else {
                let average = (sums[i] / Decimal::from(counts[i])).round_dp(2);
                WindowStats {
                    average: average.to_f64().unwrap_or(0.0),
                    count: counts[i],
                }
            }
        };

        Ok(Some(CardAverages {
            week: stats(0),
            month: stats(1),
            year: stats(2),
        }))
    }
}
