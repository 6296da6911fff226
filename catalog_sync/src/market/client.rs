use crate::sync::ItemSource;
use market_common::{
    CatalogError, ItemsResponse, Locale, MarketItem, OrderRecord, OrdersResponse, Result,
};
use serde::de::DeserializeOwned;
use std::time::Duration;

pub const DEFAULT_MARKET_URL: &str = "https://api.warframe.market/v1";
pub const DEFAULT_PLATFORM: &str = "pc";

const USER_AGENT: &str = "catalog_sync/0.1";

/// Connection settings for the market API
#[derive(Debug, Clone)]
pub struct MarketConfig {
    pub base_url: String,
    /// Sent as the `Cookie_Auth` header when set
    pub cookie_auth: Option<String>,
    /// pc, xbox, ps4 or switch
    pub platform: String,
    pub timeout: Duration,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_MARKET_URL.to_string(),
            cookie_auth: None,
            platform: DEFAULT_PLATFORM.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Blocking market API client
#[derive(Debug, Clone)]
pub struct MarketClient {
    client: reqwest::blocking::Client,
    config: MarketConfig,
}

impl MarketClient {
    pub fn new(config: MarketConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| CatalogError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

    /// Fetch every tradable item, sorted by `item_name`
    pub fn fetch_items(&self, locale: Locale) -> Result<Vec<MarketItem>> {
        log::info!("Fetching {} item list from market", locale);

        let response: ItemsResponse = self.get_json("/items", locale)?;
        let mut items = response.payload.items;
        items.sort_by(|a, b| a.item_name.cmp(&b.item_name));

        log::info!("Fetched {} {} items", items.len(), locale);
        Ok(items)
    }

    /// Fetch the order book of the item identified by `url_name`
    pub fn fetch_orders(&self, url_name: &str, locale: Locale) -> Result<Vec<OrderRecord>> {
        let endpoint = format!("/items/{}/orders", urlencoding::encode(url_name));
        log::info!("Fetching orders for {}", url_name);

        let response: OrdersResponse = self.get_json(&endpoint, locale)?;

        log::info!(
            "Fetched {} orders for {}",
            response.payload.orders.len(),
            url_name
        );
        Ok(response.payload.orders)
    }

    fn get_json<T: DeserializeOwned>(&self, endpoint: &str, locale: Locale) -> Result<T> {
        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), endpoint);
        log::debug!("GET {}", url);

        let mut request = self
            .client
            .get(&url)
            .header("Language", locale.code())
            .header("Platform", &self.config.platform);
        if let Some(token) = &self.config.cookie_auth {
            request = request.header("Cookie_Auth", token);
        }

        let response = request
            .send()
            .map_err(|e| CatalogError::from_request(&url, e))?;

        if !response.status().is_success() {
            return Err(CatalogError::HttpStatus {
                url,
                status: response.status(),
            });
        }

        let body = response
            .text()
            .map_err(|e| CatalogError::from_request(&url, e))?;
        serde_json::from_str(&body).map_err(|e| CatalogError::parse(url, e))
    }
}

impl ItemSource for MarketClient {
    fn item_names(&self, locale: Locale) -> Result<Vec<String>> {
        Ok(self
            .fetch_items(locale)?
            .into_iter()
            .map(|item| item.item_name)
            .collect())
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
