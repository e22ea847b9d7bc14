//! Configuration for market data operations

use crate::error::{MarketError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for market data operations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketConfig {
    /// Path of the read-only ticker lookup database
    pub ticker_db_path: PathBuf,

    /// Request timeout for outbound HTTP calls
    pub request_timeout: Duration,

    /// Base URL of the external search-ticker API
    pub search_ticker_base_url: String,

    /// API key for the search-ticker API (optional; without it only the
    /// local ticker table is consulted)
    pub search_ticker_api_key: Option<String>,

    /// Rate limit for the search-ticker API, requests per minute
    pub search_ticker_rate_limit: u32,

    /// Calendar-day window for historical price fetches
    pub price_window_days: i64,

    /// Maximum number of headlines returned by the news fetcher
    pub news_max_headlines: usize,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            ticker_db_path: PathBuf::from("stock_ticker_database.db"),
            request_timeout: Duration::from_secs(30),
            search_ticker_base_url: "https://oapi.kbsec.com/v2.0/NIVS01".to_string(),
            search_ticker_api_key: None,
            search_ticker_rate_limit: 60,
            price_window_days: 500,
            news_max_headlines: 10,
        }
    }
}

impl MarketConfig {
    /// Create a new configuration builder
    pub fn builder() -> MarketConfigBuilder {
        MarketConfigBuilder::default()
    }

    /// Load the search-ticker API key from the environment
    pub fn with_env_api_key(mut self) -> Self {
        if let Ok(key) = std::env::var("SEARCH_TICKER_API_KEY") {
            self.search_ticker_api_key = Some(key);
        }
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.price_window_days <= 0 {
            return Err(MarketError::ConfigError(
                "price_window_days must be greater than 0".to_string(),
            ));
        }
        if self.news_max_headlines == 0 {
            return Err(MarketError::ConfigError(
                "news_max_headlines must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for MarketConfig
#[derive(Debug, Default)]
pub struct MarketConfigBuilder {
    ticker_db_path: Option<PathBuf>,
    request_timeout: Option<Duration>,
    search_ticker_base_url: Option<String>,
    search_ticker_api_key: Option<String>,
    search_ticker_rate_limit: Option<u32>,
    price_window_days: Option<i64>,
    news_max_headlines: Option<usize>,
}

impl MarketConfigBuilder {
    /// Set the ticker database path
    pub fn ticker_db_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.ticker_db_path = Some(path.into());
        self
    }

    /// Set the request timeout
    pub fn request_timeout(mut self, duration: Duration) -> Self {
        self.request_timeout = Some(duration);
        self
    }

    /// Set the search-ticker API base URL
    pub fn search_ticker_base_url(mut self, url: impl Into<String>) -> Self {
        self.search_ticker_base_url = Some(url.into());
        self
    }

    /// Set the search-ticker API key
    pub fn search_ticker_api_key(mut self, key: impl Into<String>) -> Self {
        self.search_ticker_api_key = Some(key.into());
        self
    }

    /// Set the search-ticker rate limit (requests per minute)
    pub fn search_ticker_rate_limit(mut self, limit: u32) -> Self {
        self.search_ticker_rate_limit = Some(limit);
        self
    }

    /// Set the historical price window in calendar days
    pub fn price_window_days(mut self, days: i64) -> Self {
        self.price_window_days = Some(days);
        self
    }

    /// Set the maximum number of news headlines
    pub fn news_max_headlines(mut self, max: usize) -> Self {
        self.news_max_headlines = Some(max);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<MarketConfig> {
        let defaults = MarketConfig::default();

        let config = MarketConfig {
            ticker_db_path: self.ticker_db_path.unwrap_or(defaults.ticker_db_path),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            search_ticker_base_url: self
                .search_ticker_base_url
                .unwrap_or(defaults.search_ticker_base_url),
            search_ticker_api_key: self.search_ticker_api_key,
            search_ticker_rate_limit: self
                .search_ticker_rate_limit
                .unwrap_or(defaults.search_ticker_rate_limit),
            price_window_days: self.price_window_days.unwrap_or(defaults.price_window_days),
            news_max_headlines: self
                .news_max_headlines
                .unwrap_or(defaults.news_max_headlines),
        };

        config.validate()?;
        Ok(config)
    }
}
