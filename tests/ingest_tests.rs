mod common;

use async_trait::async_trait;
use sea_orm::EntityTrait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use cardwatch_backend::entities::prelude::*;
use cardwatch_backend::jobs::listing_ingest::{run_pass, IngestConfig};
use cardwatch_backend::marketplace::{
    ItemPrice, ItemSummary, Marketplace, MarketplaceError, SearchResponse,
};
use cardwatch_backend::services::card_store::{card_id_for_name, CardStore};

use crate::common::setup_test_db;

/// Marketplace double: every search succeeds with one qualifying listing
/// (unless the query is listed in `fail_queries`), takes a little while,
/// and records how many searches overlap.
struct CountingMarketplace {
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    searches: AtomicUsize,
    fail_queries: Vec<String>,
}

impl CountingMarketplace {
    fn new(fail_queries: Vec<String>) -> Self {
        Self {
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            searches: AtomicUsize::new(0),
            fail_queries,
        }
    }

    fn one_qualifying_listing(query: &str) -> SearchResponse {
        SearchResponse {
            total: 1,
            item_summaries: vec![ItemSummary {
                item_id: format!("v1|{}|0", query.replace(' ', "-")),
                title: query.to_string(),
                price: Some(ItemPrice {
                    value: "12.50".to_string(),
                    currency: "USD".to_string(),
                }),
                condition: Some("Used".to_string()),
                condition_id: Some("3000".to_string()),
                item_creation_date: Some("2026-08-01T00:00:00.000Z".to_string()),
            }],
        }
    }
}

#[async_trait]
impl Marketplace for CountingMarketplace {
    async fn search(&self, query: &str) -> Result<SearchResponse, MarketplaceError> {
        self.searches.fetch_add(1, Ordering::SeqCst);
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.fail_queries.iter().any(|q| q == query) {
            return Err(MarketplaceError::Transport("connection reset".to_string()));
        }

        Ok(Self::one_qualifying_listing(query))
    }
}

fn fast_config(max_concurrency: usize) -> IngestConfig {
    IngestConfig {
        max_concurrency,
        requests_per_second: 1000.0,
        ..Default::default()
    }
}

async fn seed_cards(store: &CardStore, count: usize) -> Vec<String> {
    let mut names = Vec::new();
    for i in 0..count {
        let name = format!("Card {}", i);
        assert!(store.upsert_card(&card_id_for_name(&name), &name).await);
        names.push(name);
    }
    names
}

#[tokio::test]
async fn test_pass_persists_one_listing_per_card() {
    let db = setup_test_db().await.expect("test db");
    let store = CardStore::new(db.clone());
    seed_cards(&store, 4).await;

    let marketplace = Arc::new(CountingMarketplace::new(vec![]));
    let cancel = CancellationToken::new();

    let added = run_pass(&db, marketplace.clone(), &fast_config(2), &cancel).await;

    assert_eq!(added, 4);
    assert_eq!(marketplace.searches.load(Ordering::SeqCst), 4);
    assert_eq!(Listings::find().all(&db).await.unwrap().len(), 4);
}

#[tokio::test]
async fn test_concurrency_never_exceeds_bound() {
    let db = setup_test_db().await.expect("test db");
    let store = CardStore::new(db.clone());
    seed_cards(&store, 10).await;

    let marketplace = Arc::new(CountingMarketplace::new(vec![]));
    let cancel = CancellationToken::new();

    let added = run_pass(&db, marketplace.clone(), &fast_config(2), &cancel).await;

    assert_eq!(added, 10);
    assert!(
        marketplace.max_in_flight.load(Ordering::SeqCst) <= 2,
        "no more than 2 searches may be outstanding at once"
    );
}

#[tokio::test]
async fn test_pass_survives_transport_failures() {
    let db = setup_test_db().await.expect("test db");
    let store = CardStore::new(db.clone());
    let names = seed_cards(&store, 10).await;

    let failing = names[..3].to_vec();
    let marketplace = Arc::new(CountingMarketplace::new(failing));
    let cancel = CancellationToken::new();

    let added = run_pass(&db, marketplace.clone(), &fast_config(3), &cancel).await;

    assert_eq!(added, 7, "failed cards contribute zero, the rest proceed");
    assert_eq!(marketplace.searches.load(Ordering::SeqCst), 10);
}

#[tokio::test]
async fn test_cancelled_pass_stops_between_cards() {
    let db = setup_test_db().await.expect("test db");
    let store = CardStore::new(db.clone());
    seed_cards(&store, 10).await;

    let marketplace = Arc::new(CountingMarketplace::new(vec![]));
    let cancel = CancellationToken::new();
    cancel.cancel();

    let added = run_pass(&db, marketplace.clone(), &fast_config(2), &cancel).await;

    assert_eq!(added, 0);
    assert_eq!(
        marketplace.searches.load(Ordering::SeqCst),
        0,
        "a pre-cancelled pass must not start any fetch"
    );
}

#[tokio::test]
async fn test_pass_with_no_cards_is_a_noop() {
    let db = setup_test_db().await.expect("test db");

    let marketplace = Arc::new(CountingMarketplace::new(vec![]));
    let cancel = CancellationToken::new();

    let added = run_pass(&db, marketplace.clone(), &fast_config(2), &cancel).await;

    assert_eq!(added, 0);
    assert_eq!(marketplace.searches.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_reingesting_same_listings_does_not_duplicate() {
    let db = setup_test_db().await.expect("test db");
    let store = CardStore::new(db.clone());
    seed_cards(&store, 3).await;

    let marketplace = Arc::new(CountingMarketplace::new(vec![]));
    let cancel = CancellationToken::new();

    let first = run_pass(&db, marketplace.clone(), &fast_config(2), &cancel).await;
    let second = run_pass(&db, marketplace.clone(), &fast_config(2), &cancel).await;

    // The second pass rewrites the same marketplace ids in place
    assert_eq!(first, 3);
    assert_eq!(second, 3);
    assert_eq!(Listings::find().all(&db).await.unwrap().len(), 3);
}
