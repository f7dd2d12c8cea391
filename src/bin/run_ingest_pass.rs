// src/bin/run_ingest_pass.rs
//
// One-shot ingestion pass over every tracked card.
// Usage: cargo run --bin run_ingest_pass

use sea_orm::Database;
use std::env;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cardwatch_backend::jobs::listing_ingest::{run_pass, IngestConfig};
use cardwatch_backend::marketplace::ebay::EbayService;
use cardwatch_backend::marketplace::{EbayConfig, Marketplace};
use cardwatch_backend::services::card_store::CardStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,cardwatch_backend=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();

    let database_url = env::var("DATABASE_URL").unwrap_or_else(|_| {
        std::fs::create_dir_all("data").expect("Failed to create data directory");
        "sqlite://data/cards.db?mode=rwc".to_string()
    });
    let db = Database::connect(&database_url).await?;

    CardStore::new(db.clone()).initialize().await?;

    let marketplace: Arc<dyn Marketplace> = Arc::new(EbayService::new(EbayConfig::from_env()));
    let config = IngestConfig::default();
    let cancel = CancellationToken::new();

    let added = run_pass(&db, marketplace, &config, &cancel).await;
    println!("Pass complete: {} listings added", added);

    Ok(())
}
