//! Recent headlines scraped from Google News search results

use crate::error::Result;
use reqwest::Client;
use scraper::{Html, Selector};
use tracing::warn;
use url::Url;

const NEWS_SEARCH_BASE: &str = "https://www.google.com/search";
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/102.0.0.0 Safari/537.36";

/// Headline cells in the news results page; the markup varies, so several
/// selectors are tried in order and results concatenated
const HEADLINE_SELECTORS: &[&str] = &[
    "div.n0jPhd.ynAwRc.MBeuO.nDgy9d",
    "div.n0jPhd.ynAwRc.tNxQIb.nDgy9d",
    "div.IJl0Z",
];

/// Scraped headlines plus an optional degradation note
#[derive(Debug, Clone)]
pub struct NewsDigest {
    /// Headlines in page order, capped at the configured maximum
    pub headlines: Vec<String>,
    /// Set when the source was unreachable or yielded nothing
    pub note: Option<String>,
}

impl NewsDigest {
    /// Render the digest as a numbered headline list
    pub fn to_observation(&self) -> String {
        let mut out = String::from("Recent News:\n\n");
        if self.headlines.is_empty() {
            out.push_str(
                self.note
                    .as_deref()
                    .unwrap_or("No recent news found for this query."),
            );
            out.push('\n');
            return out;
        }
        for (i, headline) in self.headlines.iter().enumerate() {
            out.push_str(&format!("{i}. {headline}\n"));
        }
        out
    }
}

/// Scrapes recent news headlines for a query
///
/// Unreachable sources degrade to an empty digest with a note rather than
/// an error, so a news outage never aborts a reasoning run.
pub struct NewsFetcher {
    client: Client,
    max_headlines: usize,
}

impl NewsFetcher {
    /// Create a fetcher keeping at most `max_headlines` headlines per query
    pub fn new(timeout: std::time::Duration, max_headlines: usize) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            max_headlines,
        })
    }

    /// Fetch recent headlines for `query`
    ///
    /// "stock news" is appended when the query does not already mention
    /// news, which keeps bare company names on topic.
    pub async fn fetch(&self, query: &str) -> NewsDigest {
        let mut search_query = query.trim().to_string();
        if !search_query.to_lowercase().contains("news") {
            search_query.push_str(" stock news");
        }

        let url = match Url::parse_with_params(
            NEWS_SEARCH_BASE,
            &[("q", search_query.as_str()), ("tbm", "nws")],
        ) {
            Ok(url) => url,
            Err(e) => {
                warn!(query = %query, error = %e, "Failed to build news search URL");
                return NewsDigest {
                    headlines: Vec::new(),
                    note: Some("News search is unavailable right now.".to_string()),
                };
            }
        };

        let body = match self.fetch_page(url).await {
            Ok(body) => body,
            Err(e) => {
                warn!(query = %query, error = %e, "News fetch failed");
                return NewsDigest {
                    headlines: Vec::new(),
                    note: Some("News search is unavailable right now.".to_string()),
                };
            }
        };

        let headlines = parse_headlines(&body, self.max_headlines);
        let note = if headlines.is_empty() {
            Some("No recent news found for this query.".to_string())
        } else {
            None
        };
        NewsDigest { headlines, note }
    }

    async fn fetch_page(&self, url: Url) -> Result<String> {
        let response = self
            .client
            .get(url)
            .header("User-Agent", USER_AGENT)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.text().await?)
    }
}

/// Extract headline text from the results page markup
///
/// Kept synchronous because `scraper::Html` is not `Send`; callers parse
/// only after all awaits on the page body are done.
fn parse_headlines(body: &str, max_headlines: usize) -> Vec<String> {
    let document = Html::parse_document(body);
    let mut headlines = Vec::new();

    for selector_str in HEADLINE_SELECTORS {
        let Ok(selector) = Selector::parse(selector_str) else {
            continue;
        };
        for element in document.select(&selector) {
            let text = element.text().collect::<String>().trim().to_string();
            if !text.is_empty() {
                headlines.push(text);
            }
        }
    }

    headlines.truncate(max_headlines);
    headlines
}
