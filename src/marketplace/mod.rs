pub mod ebay;
pub mod filter;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reference currency; listings in anything else are dropped by the filter.
pub const REFERENCE_CURRENCY: &str = "USD";

#[derive(Clone)]
pub struct EbayConfig {
    pub oauth_token: String,
    pub base_url: String,
    pub marketplace_id: String,
    pub category_id: String,
    pub page_limit: u32,
    pub timeout_secs: u64,
}

impl Default for EbayConfig {
    fn default() -> Self {
        Self {
            oauth_token: String::new(),
            base_url: "https://api.ebay.com".to_string(),
            marketplace_id: "EBAY_US".to_string(),
            category_id: "261328".to_string(),
            page_limit: 200,
            timeout_secs: 30,
        }
    }
}

impl EbayConfig {
    /// Build a config from EBAY_* environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            oauth_token: std::env::var("EBAY_OAUTH_TOKEN").unwrap_or(defaults.oauth_token),
            base_url: std::env::var("EBAY_BASE_URL").unwrap_or(defaults.base_url),
            marketplace_id: std::env::var("EBAY_MARKETPLACE_ID")
                .unwrap_or(defaults.marketplace_id),
            category_id: std::env::var("EBAY_CATEGORY_ID").unwrap_or(defaults.category_id),
            page_limit: defaults.page_limit,
            timeout_secs: defaults.timeout_secs,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    #[serde(default)]
    pub total: i64,
    #[serde(default)]
    pub item_summaries: Vec<ItemSummary>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemSummary {
    pub item_id: String,
    pub title: String,
    pub price: Option<ItemPrice>,
    pub condition: Option<String>,
    pub condition_id: Option<String>,
    pub item_creation_date: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ItemPrice {
    /// Decimal amount as returned by the marketplace, e.g. "12.50"
    pub value: String,
    pub currency: String,
}

/// One filtered listing, keyed by its marketplace id in the filter output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CanonicalListing {
    pub title: String,
    /// "label:grade", e.g. "Used:3000"
    pub condition: String,
    pub price: f64,
    pub listing_date: DateTime<Utc>,
}

#[derive(Debug)]
pub enum MarketplaceError {
    /// Non-success HTTP status from the search endpoint
    Status(u16),
    /// Network, timeout or body decoding failure
    Transport(String),
}

impl std::fmt::Display for MarketplaceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MarketplaceError::Status(status) => write!(f, "Search returned status {}", status),
            MarketplaceError::Transport(msg) => write!(f, "Transport error: {}", msg),
        }
    }
}

impl std::error::Error for MarketplaceError {}

/// Single-attempt marketplace search. Retries, if any, belong to the caller.
#[async_trait]
pub trait Marketplace: Send + Sync {
    async fn search(&self, query: &str) -> Result<SearchResponse, MarketplaceError>;
}
