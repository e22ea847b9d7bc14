//! Ticker resolution tool

use crate::resolver::TickerResolver;
use advisor_tools::Tool;
use async_trait::async_trait;
use std::sync::Arc;

const NAME: &str = "get stock ticker";
const DESCRIPTION: &str = "Use this first to find the exchange ticker symbol of the company \
                           the question is about. Input should be the user's question or the \
                           company name.";

/// Resolves the company mentioned in free text to its ticker symbol
///
/// A failed resolution is an ordinary observation, not an error; the model
/// is expected to tell the user no listed company was found.
pub struct TickerLookupTool {
    resolver: Arc<TickerResolver>,
}

impl TickerLookupTool {
    pub fn new(resolver: Arc<TickerResolver>) -> Self {
        Self { resolver }
    }
}

#[async_trait]
impl Tool for TickerLookupTool {
    async fn invoke(&self, input: &str) -> advisor_tools::Result<String> {
        match self.resolver.resolve(input).await {
            Some(resolved) => Ok(format!(
                "The ticker symbol is {}.",
                resolved.code()
            )),
            None => Ok(
                "No company found. The question does not mention a listed company this \
                 assistant can identify."
                    .to_string(),
            ),
        }
    }

    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        DESCRIPTION
    }
}
