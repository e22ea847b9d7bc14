//! Error types for market data operations

use thiserror::Error;

/// Market data specific errors
#[derive(Debug, Error)]
pub enum MarketError {
    /// API request failed
    #[error("API error: {0}")]
    ApiError(String),

    /// Invalid stock symbol provided
    #[error("Invalid symbol: {0}")]
    InvalidSymbol(String),

    /// Data not available for the requested symbol
    #[error("Data not available for {symbol}: {reason}")]
    DataUnavailable {
        /// Symbol the request was for
        symbol: String,
        /// Upstream reason
        reason: String,
    },

    /// Network or HTTP error
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Ticker table query failed
    #[error("Ticker store error: {0}")]
    StoreError(#[from] sqlx::Error),

    /// Yahoo Finance API error
    #[error("Yahoo Finance error: {0}")]
    YahooFinanceError(String),

    /// The constrained extraction step failed
    #[error("Generation error: {0}")]
    GenerationError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// Result type alias for market operations
pub type Result<T> = std::result::Result<T, MarketError>;

/// Convert MarketError into the tool-boundary error
impl From<MarketError> for advisor_tools::ToolError {
    fn from(err: MarketError) -> Self {
        advisor_tools::ToolError::Failed(err.to_string())
    }
}

impl From<advisor_llm::LLMError> for MarketError {
    fn from(err: advisor_llm::LLMError) -> Self {
        MarketError::GenerationError(err.to_string())
    }
}

impl From<advisor_prompt::PromptError> for MarketError {
    fn from(err: advisor_prompt::PromptError) -> Self {
        MarketError::GenerationError(err.to_string())
    }
}
