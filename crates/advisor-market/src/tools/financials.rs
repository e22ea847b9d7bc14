//! Financial statements tool

use crate::api::FinancialsFetcher;
use advisor_tools::Tool;
use async_trait::async_trait;

const NAME: &str = "get financial statements";
const DESCRIPTION: &str = "Use this to get the balance sheet of the company. Helps evaluate \
                           the company's historic performance. Input should be the stock \
                           ticker only.";

/// Fetches the recent balance-sheet history for a ticker
pub struct FinancialStatementsTool {
    fetcher: FinancialsFetcher,
}

impl FinancialStatementsTool {
    pub fn new(fetcher: FinancialsFetcher) -> Self {
        Self { fetcher }
    }
}

#[async_trait]
impl Tool for FinancialStatementsTool {
    async fn invoke(&self, input: &str) -> advisor_tools::Result<String> {
        let sheet = self.fetcher.fetch(input.trim()).await?;
        Ok(sheet.render())
    }

    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        DESCRIPTION
    }
}
