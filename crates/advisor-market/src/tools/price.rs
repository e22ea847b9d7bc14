//! Historical price tool

use crate::api::MarketDataFetcher;
use advisor_tools::Tool;
use async_trait::async_trait;
use chrono::NaiveDate;

const NAME: &str = "get stock price";
const DESCRIPTION: &str = "Use when asked to evaluate or analyze a stock. Outputs historic \
                           share price data. Input should be the stock ticker only, so use \
                           the ticker tool first.";

/// Rows kept in the observation; the full window would dwarf the prompt
const MAX_OBSERVATION_ROWS: usize = 120;

/// Fetches the trailing daily price history for a ticker
pub struct StockPriceTool {
    fetcher: MarketDataFetcher,
    today: NaiveDate,
}

impl StockPriceTool {
    /// `today` anchors the trailing window, making runs reproducible for a
    /// given query date
    pub fn new(fetcher: MarketDataFetcher, today: NaiveDate) -> Self {
        Self { fetcher, today }
    }
}

#[async_trait]
impl Tool for StockPriceTool {
    async fn invoke(&self, input: &str) -> advisor_tools::Result<String> {
        let symbol = input.trim();
        let series = self.fetcher.fetch(symbol, self.today).await?;
        Ok(series.render(MAX_OBSERVATION_ROWS))
    }

    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        DESCRIPTION
    }
}
