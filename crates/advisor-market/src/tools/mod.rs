//! [`advisor_tools::Tool`] implementations over the market data layer
//!
//! Tool names are part of the prompt contract: the model selects actions by
//! these exact strings, so they are lowercase natural-language phrases.

mod financials;
mod news;
mod price;
mod ticker;

pub use financials::FinancialStatementsTool;
pub use news::RecentNewsTool;
pub use price::StockPriceTool;
pub use ticker::TickerLookupTool;
