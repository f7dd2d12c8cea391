// src/bin/add_cards.rs
//
// Seed tracked cards by name; ids are derived from the names.
// Usage: cargo run --bin add_cards -- "2017 Prizm Patrick Mahomes #269" ...

use sea_orm::Database;
use std::env;

use cardwatch_backend::services::card_store::{card_id_for_name, CardStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let names: Vec<String> = env::args().skip(1).collect();
    if names.is_empty() {
        eprintln!("Usage: add_cards <card name> [<card name> ...]");
        std::process::exit(1);
    }

    let database_url = env::var("DATABASE_URL").unwrap_or_else(|_| {
        std::fs::create_dir_all("data").expect("Failed to create data directory");
        "sqlite://data/cards.db?mode=rwc".to_string()
    });
    let db = Database::connect(&database_url).await?;

    let store = CardStore::new(db);
    store.initialize().await?;

    let mut added = 0;
    for name in &names {
        let card_id = card_id_for_name(name);
        if store.upsert_card(&card_id, name).await {
            println!("{}  {}", card_id, name);
            added += 1;
        }
    }

    println!("Upserted {}/{} cards", added, names.len());
    Ok(())
}
