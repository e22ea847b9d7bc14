//! Balance-sheet history from Yahoo Finance quoteSummary

use crate::error::{MarketError, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

const QUOTE_SUMMARY_BASE: &str = "https://query1.finance.yahoo.com/v10/finance/quoteSummary";
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/102.0.0.0 Safari/537.36";

/// Number of reporting periods kept per statement
const KEPT_PERIODS: usize = 3;

/// One balance-sheet line item across the kept periods
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceSheetRow {
    /// Line-item label (e.g. "totalAssets")
    pub label: String,
    /// One value per kept period, most recent first
    pub values: Vec<f64>,
}

/// Balance-sheet snapshot restricted to the most recent reporting periods
///
/// Rows with a missing value in any kept period are dropped entirely; a row
/// must be fully present across all kept periods to be retained.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceSheet {
    /// Symbol the statement was fetched for
    pub symbol: String,
    /// Period end dates, most recent first
    pub periods: Vec<String>,
    /// Complete rows only
    pub rows: Vec<BalanceSheetRow>,
}

impl BalanceSheet {
    /// Render the statement as labeled rows for the observation string
    pub fn render(&self) -> String {
        if self.rows.is_empty() {
            return format!("No financial statement data available for {}.", self.symbol);
        }

        let mut out = format!("Balance sheet for {} ({})\n", self.symbol, self.periods.join(", "));
        for row in &self.rows {
            let values = row
                .values
                .iter()
                .map(|v| format!("{v:.0}"))
                .collect::<Vec<_>>()
                .join(", ");
            out.push_str(&format!("{}: {}\n", row.label, values));
        }
        out
    }
}

/// Fetches balance-sheet history; pure per call
#[derive(Debug, Clone)]
pub struct FinancialsFetcher {
    client: Client,
}

impl FinancialsFetcher {
    /// Create a fetcher with the given request timeout
    pub fn new(timeout: std::time::Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    /// Fetch the balance sheet for `ticker`, keeping the most recent 3
    /// reporting periods
    pub async fn fetch(&self, ticker: &str) -> Result<BalanceSheet> {
        let symbol = ticker.trim();
        let url = format!("{QUOTE_SUMMARY_BASE}/{symbol}?modules=balanceSheetHistory");

        let response = self
            .client
            .get(&url)
            .header("User-Agent", USER_AGENT)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(MarketError::DataUnavailable {
                symbol: symbol.to_string(),
                reason: format!("quoteSummary returned HTTP {}", response.status()),
            });
        }

        let body: Value = response.json().await?;
        let statements = body["quoteSummary"]["result"][0]["balanceSheetHistory"]
            ["balanceSheetStatements"]
            .as_array()
            .ok_or_else(|| MarketError::DataUnavailable {
                symbol: symbol.to_string(),
                reason: "no balanceSheetStatements in response".to_string(),
            })?;

        let sheet = balance_sheet_from_statements(symbol, statements);
        debug!(symbol = %symbol, periods = sheet.periods.len(), rows = sheet.rows.len(),
               "Fetched balance sheet");
        Ok(sheet)
    }
}

/// Build the snapshot from raw quoteSummary statements (most recent first),
/// keeping at most [`KEPT_PERIODS`] periods and dropping incomplete rows
pub fn balance_sheet_from_statements(symbol: &str, statements: &[Value]) -> BalanceSheet {
    let kept: Vec<&Value> = statements.iter().take(KEPT_PERIODS).collect();

    let periods = kept
        .iter()
        .map(|s| {
            s["endDate"]["fmt"]
                .as_str()
                .unwrap_or("unknown")
                .to_string()
        })
        .collect();

    // Labels in first-statement order, then any label only later periods add
    let mut labels: Vec<String> = Vec::new();
    for statement in &kept {
        if let Some(map) = statement.as_object() {
            for key in map.keys() {
                if key == "endDate" || key == "maxAge" {
                    continue;
                }
                if !labels.iter().any(|l| l == key) {
                    labels.push(key.clone());
                }
            }
        }
    }

    let rows = labels
        .into_iter()
        .filter_map(|label| {
            let values: Option<Vec<f64>> = kept
                .iter()
                .map(|s| s[&label]["raw"].as_f64())
                .collect();
            // Rows missing any period are dropped entirely
            values.map(|values| BalanceSheetRow { label, values })
        })
        .collect();

    BalanceSheet {
        symbol: symbol.to_string(),
        periods,
        rows,
    }
}
