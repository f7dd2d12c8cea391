use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

use cardwatch_backend::services::card_store::CardStore;

/// Set up a fresh in-memory test database with the full schema applied.
/// Pinned to a single connection so every query sees the same database.
pub async fn setup_test_db() -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new("sqlite::memory:".to_owned());
    options.max_connections(1);

    let db = Database::connect(options).await?;
    CardStore::new(db.clone()).initialize().await?;

    Ok(db)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_setup_test_db() {
        let db = setup_test_db().await;
        assert!(db.is_ok(), "Test database setup should succeed");
    }
}
