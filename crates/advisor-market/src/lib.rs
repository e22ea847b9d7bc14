//! Market data layer for advisor-rs
//!
//! Everything the reasoning loop needs to assemble an investment brief:
//!
//! - Ticker resolution from free-text company references, via a constrained
//!   generation step plus a local ticker table (primary) or an external
//!   search-ticker API (fallback)
//! - Historical price series from Yahoo Finance
//! - Recent headlines scraped from a news search
//! - Balance-sheet snapshots restricted to the latest reporting periods
//!
//! Each fetcher is pure per call; the [`tools`] module wraps them in the
//! named [`advisor_tools::Tool`] implementations the registry dispatches to.
//! Every upstream failure is caught at the tool boundary and degrades to a
//! model-visible observation; nothing in this crate aborts the outer loop.

pub mod api;
pub mod config;
pub mod error;
pub mod resolver;
pub mod store;
pub mod ticker;
pub mod tools;

pub use config::MarketConfig;
pub use error::{MarketError, Result};
pub use resolver::TickerResolver;
pub use store::TickerStore;
pub use ticker::{MarketSuffix, ResolvedTicker};
pub use tools::{FinancialStatementsTool, RecentNewsTool, StockPriceTool, TickerLookupTool};
