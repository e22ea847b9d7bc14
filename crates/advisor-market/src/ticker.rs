//! Resolved ticker types

use serde::{Deserialize, Serialize};

/// Market qualifier for a resolved symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarketSuffix {
    /// KOSPI listing, quoted as `SYMBOL.KS`
    Kospi,
    /// KOSDAQ listing, quoted as `SYMBOL.KQ`
    Kosdaq,
    /// U.S. listing, no suffix
    UnitedStates,
}

impl MarketSuffix {
    /// The suffix appended to the bare symbol
    pub fn suffix(self) -> &'static str {
        match self {
            MarketSuffix::Kospi => ".KS",
            MarketSuffix::Kosdaq => ".KQ",
            MarketSuffix::UnitedStates => "",
        }
    }
}

/// A canonical exchange symbol plus market qualifier
///
/// Produced by [`crate::TickerResolver`], consumed by the price and
/// financial-statement fetchers; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedTicker {
    /// Bare exchange symbol (e.g. "AMZN", "005930")
    pub symbol: String,
    /// Listing venue qualifier
    pub market: MarketSuffix,
}

impl ResolvedTicker {
    /// Create a U.S.-listed ticker
    pub fn us(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            market: MarketSuffix::UnitedStates,
        }
    }

    /// Fully qualified code with market suffix, as the data providers expect
    pub fn code(&self) -> String {
        format!("{}{}", self.symbol, self.market.suffix())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_market_suffix_mapping() {
        let kospi = ResolvedTicker {
            symbol: "005930".to_string(),
            market: MarketSuffix::Kospi,
        };
        assert_eq!(kospi.code(), "005930.KS");

        let kosdaq = ResolvedTicker {
            symbol: "035720".to_string(),
            market: MarketSuffix::Kosdaq,
        };
        assert_eq!(kosdaq.code(), "035720.KQ");

        assert_eq!(ResolvedTicker::us("AMZN").code(), "AMZN");
    }
}
