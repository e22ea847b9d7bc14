//! Recent news tool

use crate::api::NewsFetcher;
use advisor_tools::Tool;
use async_trait::async_trait;

const NAME: &str = "get recent news";
const DESCRIPTION: &str = "Use this to fetch recent news about a stock or company. Input \
                           should be the company name or ticker.";

/// Fetches recent headlines for a company or ticker
///
/// Never fails: an unreachable news source becomes an observation saying so.
pub struct RecentNewsTool {
    fetcher: NewsFetcher,
}

impl RecentNewsTool {
    pub fn new(fetcher: NewsFetcher) -> Self {
        Self { fetcher }
    }
}

#[async_trait]
impl Tool for RecentNewsTool {
    async fn invoke(&self, input: &str) -> advisor_tools::Result<String> {
        Ok(self.fetcher.fetch(input).await.to_observation())
    }

    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        DESCRIPTION
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_metadata() {
        let tool = RecentNewsTool::new(NewsFetcher::new(Duration::from_secs(30), 10).unwrap());
        assert_eq!(tool.name(), "get recent news");
        assert!(tool.description().contains("news"));
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_invoke_live() {
        let tool = RecentNewsTool::new(NewsFetcher::new(Duration::from_secs(30), 10).unwrap());
        let obs = tool.invoke("Apple").await.unwrap();
        assert!(obs.starts_with("Recent News:"));
    }
}
