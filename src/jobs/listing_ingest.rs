//! Listing ingestion job
//!
//! One pass sweeps every tracked card: search the marketplace, filter the
//! raw results, upsert the survivors. A bounded worker pool drains a
//! snapshot of the card set; per-card failures contribute zero and never
//! halt the pass.

use sea_orm::DatabaseConnection;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinSet;
use tokio::time::{interval, Duration, Instant};
use tokio_util::sync::CancellationToken;

use crate::marketplace::filter::filter_listings;
use crate::marketplace::Marketplace;
use crate::services::card_store::CardStore;
use crate::services::pacer::Pacer;

const PROGRESS_LOG_INTERVAL: usize = 10;

#[derive(Clone)]
pub struct IngestConfig {
    /// Bulkhead: maximum simultaneously in-flight marketplace searches
    pub max_concurrency: usize,
    /// Per-worker-slot pacing of successive searches
    pub requests_per_second: f64,
    /// Spacing between passes of the periodic job
    pub pass_interval_secs: u64,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            max_concurrency: 3,
            requests_per_second: 1.0,
            pass_interval_secs: 3600,
        }
    }
}

/// Runs one full ingestion pass over a snapshot of all tracked cards and
/// returns the number of listings written. Cards added mid-pass are picked
/// up on the next pass. Cancellation is honored between cards; an in-flight
/// fetch completes (or times out) before its worker exits.
pub async fn run_pass(
    db: &DatabaseConnection,
    marketplace: Arc<dyn Marketplace>,
    config: &IngestConfig,
    cancel: &CancellationToken,
) -> u64 {
    let store = CardStore::new(db.clone());

    let cards = match store.all_cards().await {
        Ok(cards) => cards,
        Err(e) => {
            tracing::error!(error = %e, "Failed to read card snapshot");
            return 0;
        }
    };

    if cards.is_empty() {
        tracing::warn!("No cards found in database");
        return 0;
    }

    let total_cards = cards.len();
    tracing::info!(
        cards = total_cards,
        max_concurrency = config.max_concurrency,
        "Starting ingestion pass"
    );

    let queue: Arc<Mutex<VecDeque<(String, String)>>> =
        Arc::new(Mutex::new(cards.into_iter().collect()));
    let pacer = Arc::new(Pacer::new(config.requests_per_second));
    let completed = Arc::new(AtomicUsize::new(0));
    let total_added = Arc::new(AtomicU64::new(0));

    let mut workers = JoinSet::new();
    for _ in 0..config.max_concurrency.max(1) {
        let queue = queue.clone();
        let store = store.clone();
        let marketplace = marketplace.clone();
        let pacer = pacer.clone();
        let completed = completed.clone();
        let total_added = total_added.clone();
        let cancel = cancel.clone();

        workers.spawn(async move {
            loop {
                if cancel.is_cancelled() {
                    break;
                }

                let next = queue.lock().await.pop_front();
                let Some((card_id, card_name)) = next else {
                    break;
                };

                let fetch_started = Instant::now();
                let added = process_card(&store, marketplace.as_ref(), &card_id, &card_name).await;
                total_added.fetch_add(added, Ordering::Relaxed);

                let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
                if done % PROGRESS_LOG_INTERVAL == 0 {
                    tracing::info!(processed = done, total = total_cards, "Ingestion progress");
                }

                pacer.pace_from(fetch_started).await;
            }
        });
    }

    while workers.join_next().await.is_some() {}

    let total = total_added.load(Ordering::Relaxed);
    if cancel.is_cancelled() {
        tracing::info!(
            processed = completed.load(Ordering::Relaxed),
            total = total_cards,
            listings_added = total,
            "Ingestion pass cancelled"
        );
    } else {
        tracing::info!(listings_added = total, "Ingestion pass complete");
    }

    total
}

/// Fetch, filter and persist one card's listings. Any failure contributes
/// zero; the pass carries on with the next card.
async fn process_card(
    store: &CardStore,
    marketplace: &dyn Marketplace,
    card_id: &str,
    card_name: &str,
) -> u64 {
    let data = match marketplace.search(card_name).await {
        Ok(data) => data,
        Err(e) => {
            tracing::error!(card = %card_name, error = %e, "Marketplace search failed");
            return 0;
        }
    };

    let Some(listings) = filter_listings(&data) else {
        tracing::debug!(card = %card_name, "No qualifying listings");
        return 0;
    };

    let mut added = 0u64;
    for (listing_id, listing) in listings {
        let ok = store
            .upsert_listing(
                &listing_id,
                card_id,
                &listing.title,
                &listing.condition,
                listing.price,
                listing.listing_date,
            )
            .await;
        if ok {
            added += 1;
        }
    }

    tracing::info!(card = %card_name, card_id = %card_id, added = added, "Processed card");
    added
}

/// Spawns the periodic ingestion job: one pass per interval tick until the
/// token is cancelled.
pub fn start_listing_ingest_job(
    db: DatabaseConnection,
    marketplace: Arc<dyn Marketplace>,
    config: IngestConfig,
    cancel: CancellationToken,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = interval(Duration::from_secs(config.pass_interval_secs));

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = interval.tick() => {}
            }

            tracing::info!("Starting scheduled listing ingestion");
            run_pass(&db, marketplace.clone(), &config, &cancel).await;

            if cancel.is_cancelled() {
                break;
            }
        }

        tracing::info!("Listing ingestion job stopped");
    })
}
