use sea_orm::Database;
use std::env;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cardwatch_backend::jobs::listing_ingest::{start_listing_ingest_job, IngestConfig};
use cardwatch_backend::marketplace::ebay::EbayService;
use cardwatch_backend::marketplace::{EbayConfig, Marketplace};
use cardwatch_backend::services::card_store::CardStore;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,cardwatch_backend=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    // Connect to database
    let database_url = env::var("DATABASE_URL").unwrap_or_else(|_| {
        std::fs::create_dir_all("data").expect("Failed to create data directory");
        "sqlite://data/cards.db?mode=rwc".to_string()
    });

    tracing::info!("Connecting to database...");
    let db = Database::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    // Run migrations
    tracing::info!("Running migrations...");
    CardStore::new(db.clone())
        .initialize()
        .await
        .expect("Failed to run migrations");

    let marketplace: Arc<dyn Marketplace> = Arc::new(EbayService::new(EbayConfig::from_env()));

    let config = IngestConfig {
        pass_interval_secs: env::var("INGEST_INTERVAL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(3600),
        ..Default::default()
    };

    let cancel = CancellationToken::new();
    let job = start_listing_ingest_job(db, marketplace, config, cancel);

    tracing::info!("Listing ingestion daemon started");

    if let Err(e) = job.await {
        tracing::error!(error = %e, "Ingestion job exited abnormally");
    }
}
