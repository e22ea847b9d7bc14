//! External company-name-to-ticker classification API
//!
//! Used as the fallback resolution path for names the local ticker table
//! does not know, typically Korean listings. The API classifies the match
//! by market code: '1' is a KOSPI listing, '2' is KOSDAQ.

use crate::error::{MarketError, Result};
use crate::ticker::{MarketSuffix, ResolvedTicker};
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::sync::Arc;
use tracing::debug;

type SharedRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

/// Client for the search-ticker API with rate limiting
pub struct SearchTickerClient {
    client: Client,
    base_url: String,
    api_key: String,
    rate_limiter: SharedRateLimiter,
}

impl SearchTickerClient {
    /// Create a new client
    ///
    /// # Arguments
    /// * `base_url` - API base URL
    /// * `api_key` - API key sent in the `apikey` header
    /// * `rate_limit` - Requests per minute
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        rate_limit: u32,
    ) -> Self {
        let per_minute =
            NonZeroU32::new(rate_limit).unwrap_or(NonZeroU32::new(60).expect("nonzero default"));
        let quota = Quota::per_minute(per_minute);
        let rate_limiter = Arc::new(RateLimiter::direct(quota));

        Self {
            client: Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
            rate_limiter,
        }
    }

    /// Classify a company name into a market-qualified ticker
    ///
    /// Returns `Ok(None)` when the API has no match or reports a market
    /// class outside the known venues.
    pub async fn search_ticker(&self, company_name: &str) -> Result<Option<ResolvedTicker>> {
        self.rate_limiter.until_ready().await;

        let url = format!("{}/search-ticker", self.base_url);
        let request = SearchTickerRequest {
            data_header: DataHeader { ud_id: "advisor-rs" },
            data_body: DataBody {
                is_nm: company_name,
            },
        };

        let response = self
            .client
            .post(&url)
            .header("apikey", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| MarketError::ApiError(format!("search-ticker request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(MarketError::ApiError(format!(
                "search-ticker API error {status}: {body}"
            )));
        }

        let parsed: SearchTickerResponse = response.json().await.map_err(|e| {
            MarketError::ApiError(format!("Failed to parse search-ticker response: {e}"))
        })?;

        if parsed.data_header.result_code != "200" {
            debug!(
                company = %company_name,
                result_code = %parsed.data_header.result_code,
                "search-ticker returned no match"
            );
            return Ok(None);
        }

        let Some(entry) = parsed.data_body.out2.first() else {
            return Ok(None);
        };

        let market = match entry.mkt_clsf.trim() {
            "1" => MarketSuffix::Kospi,
            "2" => MarketSuffix::Kosdaq,
            _ => return Ok(None),
        };

        Ok(Some(ResolvedTicker {
            symbol: entry.is_cd.trim().to_string(),
            market,
        }))
    }
}

#[derive(Debug, Serialize)]
struct SearchTickerRequest<'a> {
    #[serde(rename = "dataHeader")]
    data_header: DataHeader,
    #[serde(rename = "dataBody")]
    data_body: DataBody<'a>,
}

#[derive(Debug, Serialize)]
struct DataHeader {
    #[serde(rename = "udId")]
    ud_id: &'static str,
}

#[derive(Debug, Serialize)]
struct DataBody<'a> {
    #[serde(rename = "isNm")]
    is_nm: &'a str,
}

#[derive(Debug, Deserialize)]
struct SearchTickerResponse {
    #[serde(rename = "dataHeader")]
    data_header: ResponseHeader,
    #[serde(rename = "dataBody")]
    data_body: ResponseBody,
}

#[derive(Debug, Deserialize)]
struct ResponseHeader {
    #[serde(rename = "resultCode")]
    result_code: String,
}

#[derive(Debug, Deserialize)]
struct ResponseBody {
    #[serde(default)]
    out2: Vec<TickerEntry>,
}

#[derive(Debug, Deserialize)]
struct TickerEntry {
    #[serde(rename = "isCd")]
    is_cd: String,
    #[serde(rename = "mktClsf")]
    mkt_clsf: String,
}
