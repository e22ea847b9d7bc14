//! External data source clients

pub mod financials;
pub mod news;
pub mod search_ticker;
pub mod yahoo;

pub use financials::{BalanceSheet, BalanceSheetRow, FinancialsFetcher};
pub use news::{NewsDigest, NewsFetcher};
pub use search_ticker::SearchTickerClient;
pub use yahoo::{MarketDataFetcher, PriceBar, PriceSeries};
