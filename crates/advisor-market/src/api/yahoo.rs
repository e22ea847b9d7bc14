//! Historical price data from Yahoo Finance

use crate::error::{MarketError, Result};
use chrono::{DateTime, Days, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::debug;
use yahoo_finance_api as yahoo;

/// One trading day of OHLCV data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceBar {
    /// Trading date
    pub date: NaiveDate,
    /// Opening price
    pub open: f64,
    /// Intraday high
    pub high: f64,
    /// Intraday low
    pub low: f64,
    /// Closing price
    pub close: f64,
    /// Traded volume
    pub volume: u64,
    /// Split/dividend adjusted close
    pub adj_close: f64,
}

/// Ascending-date OHLCV series for one symbol
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceSeries {
    /// Symbol the series was fetched for
    pub symbol: String,
    /// One bar per trading day, ascending by date
    pub bars: Vec<PriceBar>,
}

impl PriceSeries {
    /// Whether the window contained no trading data
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Render the series as CSV-like lines, keeping at most the most recent
    /// `max_rows` bars to bound prompt size
    pub fn render(&self, max_rows: usize) -> String {
        if self.bars.is_empty() {
            return format!(
                "No trading data available for {} in the requested window.",
                self.symbol
            );
        }

        let skipped = self.bars.len().saturating_sub(max_rows);
        let mut out = String::new();
        if skipped > 0 {
            out.push_str(&format!(
                "(showing the most recent {max_rows} of {} trading days)\n",
                self.bars.len()
            ));
        }
        out.push_str("Date,Open,High,Low,Close,Volume\n");
        for bar in &self.bars[skipped..] {
            out.push_str(&format!(
                "{},{:.2},{:.2},{:.2},{:.2},{}\n",
                bar.date, bar.open, bar.high, bar.low, bar.close, bar.volume
            ));
        }
        out
    }
}

/// Fetches a fixed trailing window of daily price history
///
/// Pure per call: no cache, no shared mutable state.
#[derive(Debug, Clone)]
pub struct MarketDataFetcher {
    window_days: i64,
}

impl MarketDataFetcher {
    /// Create a fetcher with the given trailing window in calendar days
    pub fn new(window_days: i64) -> Self {
        Self { window_days }
    }

    /// Fetch the OHLCV series for `symbol` covering the trailing window
    /// ending on `today`
    ///
    /// A venue with no data for the window yields an empty series, not an
    /// error.
    pub async fn fetch(&self, symbol: &str, today: NaiveDate) -> Result<PriceSeries> {
        let provider = yahoo::YahooConnector::new()
            .map_err(|e| MarketError::YahooFinanceError(e.to_string()))?;

        let start_date = today - chrono::Duration::days(self.window_days);
        let end_date = today
            .checked_add_days(Days::new(1))
            .unwrap_or(today);

        let start = to_offset_datetime(start_date)?;
        let end = to_offset_datetime(end_date)?;

        let response = provider
            .get_quote_history(symbol, start, end)
            .await
            .map_err(|e| MarketError::YahooFinanceError(e.to_string()))?;

        // An empty window comes back as a quote error, not a data error
        let mut quotes = response.quotes().unwrap_or_default();
        quotes.sort_by_key(|q| q.timestamp);

        let bars = quotes
            .iter()
            .filter_map(|q| {
                let date = DateTime::from_timestamp(q.timestamp as i64, 0)?.date_naive();
                Some(PriceBar {
                    date,
                    open: q.open,
                    high: q.high,
                    low: q.low,
                    close: q.close,
                    volume: q.volume,
                    adj_close: q.adjclose,
                })
            })
            .collect::<Vec<_>>();

        debug!(symbol = %symbol, bars = bars.len(), "Fetched price history");
        Ok(PriceSeries {
            symbol: symbol.to_string(),
            bars,
        })
    }
}

fn to_offset_datetime(date: NaiveDate) -> Result<OffsetDateTime> {
    let timestamp = date.and_time(NaiveTime::MIN).and_utc().timestamp();
    OffsetDateTime::from_unix_timestamp(timestamp)
        .map_err(|e| MarketError::YahooFinanceError(format!("Invalid timestamp: {e}")))
}
