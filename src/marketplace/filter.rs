//! Filtering of raw search results into canonical listings

use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::str::FromStr;

use super::{CanonicalListing, SearchResponse, REFERENCE_CURRENCY};

/// Id suffix marker distinguishing base cards from parallels and inserts.
const BASE_VARIANT_MARKER: &str = "|0";

/// Applies the acceptance rules to one page of raw search results.
///
/// Every rule is a hard reject: ids without the base-variant marker,
/// non-reference currencies, missing condition data, malformed or negative
/// prices and unparseable creation timestamps all drop the item. Returns
/// `None` when the page had no raw items or no survivors, so callers can
/// skip the persistence pass entirely.
pub fn filter_listings(data: &SearchResponse) -> Option<HashMap<String, CanonicalListing>> {
    if data.total == 0 {
        return None;
    }

    let mut items = HashMap::new();

    for item in &data.item_summaries {
        if !item.item_id.contains(BASE_VARIANT_MARKER) {
            continue;
        }

        let Some(price) = &item.price else {
            continue;
        };
        if price.currency != REFERENCE_CURRENCY {
            continue;
        }

        let (Some(condition), Some(condition_id)) = (&item.condition, &item.condition_id) else {
            continue;
        };

        let Some(amount) = parse_price(&price.value) else {
            continue;
        };

        let Some(listing_date) = item
            .item_creation_date
            .as_deref()
            .and_then(parse_listing_date)
        else {
            continue;
        };

        // Last write wins; a single page cannot carry true duplicates
        items.insert(
            item.item_id.clone(),
            CanonicalListing {
                title: item.title.clone(),
                condition: format!("{}:{}", condition, condition_id),
                price: amount,
                listing_date,
            },
        );
    }

    if items.is_empty() {
        None
    } else {
        Some(items)
    }
}

fn parse_price(value: &str) -> Option<f64> {
    let amount = Decimal::from_str(value).ok()?;
    if amount.is_sign_negative() {
        return None;
    }
    amount.to_f64()
}

/// Parses the marketplace creation timestamp, e.g. "2024-11-03T18:02:11.000Z".
fn parse_listing_date(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
