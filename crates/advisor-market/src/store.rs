//! Read-only ticker lookup table
//!
//! The table is owned by an external collaborator; this module only
//! implements the read contract: query by company name, exact match first,
//! then substring, at most one row.

use crate::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool};
use std::path::Path;
use tracing::debug;

/// Read-only handle on the `stock_ticker` table
///
/// Schema: `stock_ticker(symbol TEXT PRIMARY KEY, name TEXT NOT NULL,
/// currency TEXT, stockExchange TEXT, exchangeShortName TEXT)`.
pub struct TickerStore {
    pool: SqlitePool,
}

impl TickerStore {
    /// Open the database at `path` read-only
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(path.as_ref())
            .read_only(true);
        let pool = SqlitePool::connect_with(options).await?;
        Ok(Self { pool })
    }

    /// Wrap an existing pool (used by tests)
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Look up the symbol for a company name
    ///
    /// Exact name match is tried first, then a substring match; the LIMIT
    /// applies to the compound select so at most one row comes back.
    pub async fn lookup_symbol(&self, name: &str) -> Result<Option<String>> {
        let symbol = sqlx::query_scalar::<_, String>(
            "SELECT symbol FROM stock_ticker WHERE name = ?1 \
             UNION ALL \
             SELECT symbol FROM stock_ticker WHERE name LIKE '%' || ?1 || '%' \
             LIMIT 1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        debug!(company = %name, symbol = ?symbol, "Ticker table lookup");
        Ok(symbol)
    }
}
