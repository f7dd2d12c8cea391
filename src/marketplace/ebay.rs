//! eBay Browse API search client

use reqwest::Client;
use std::time::Duration;

use super::{EbayConfig, Marketplace, MarketplaceError, SearchResponse};

#[derive(Clone)]
pub struct EbayService {
    client: Client,
    config: EbayConfig,
}

impl EbayService {
    pub fn new(config: EbayConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .gzip(true)
            .deflate(true)
            .brotli(true)
            .build()
            .unwrap();

        Self { client, config }
    }
}

#[async_trait::async_trait]
impl Marketplace for EbayService {
    async fn search(&self, query: &str) -> Result<SearchResponse, MarketplaceError> {
        let url = format!("{}/buy/browse/v1/item_summary/search", self.config.base_url);
        let limit = self.config.page_limit.to_string();

        let response = self
            .client
            .get(&url)
            .header("X-EBAY-C-MARKETPLACE-ID", &self.config.marketplace_id)
            .header(
                "Authorization",
                format!("Bearer {}", self.config.oauth_token),
            )
            .query(&[
                ("q", query),
                ("category_ids", self.config.category_id.as_str()),
                ("limit", limit.as_str()),
            ])
            .send()
            .await
            .map_err(|e| MarketplaceError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            tracing::error!(query = %query, status = status, "eBay search failed");
            return Err(MarketplaceError::Status(status));
        }

        let data: SearchResponse = response
            .json()
            .await
            .map_err(|e| MarketplaceError::Transport(e.to_string()))?;

        if data.total == 0 {
            tracing::warn!(query = %query, "Search returned 0 results");
        }

        Ok(data)
    }
}
