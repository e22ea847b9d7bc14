//! Company-name to ticker resolution
//!
//! Resolution runs in three stages: constrained name extraction through the
//! text generator, a local ticker-table lookup, then the external
//! classification API as fallback. Every failure along the way degrades to
//! `None` so callers can report "no company found" instead of erroring.

use crate::api::SearchTickerClient;
use crate::store::TickerStore;
use crate::ticker::ResolvedTicker;
use advisor_llm::{GenerationParams, TextGenerator};
use advisor_prompt::PromptAssembler;
use std::sync::Arc;
use tracing::{debug, warn};

/// Extraction answer meaning "no company name in the input"
const NO_COMPANY_SENTINEL: &str = "NONE";

/// Resolves free-form user text to a market-qualified ticker
pub struct TickerResolver {
    generator: Arc<dyn TextGenerator>,
    assembler: Arc<PromptAssembler>,
    store: Option<Arc<TickerStore>>,
    search_api: Option<Arc<SearchTickerClient>>,
}

impl TickerResolver {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        assembler: Arc<PromptAssembler>,
        store: Option<Arc<TickerStore>>,
        search_api: Option<Arc<SearchTickerClient>>,
    ) -> Self {
        Self {
            generator,
            assembler,
            store,
            search_api,
        }
    }

    /// Resolve `input` to a ticker, or `None` when no listed company can be
    /// identified
    pub async fn resolve(&self, input: &str) -> Option<ResolvedTicker> {
        let company = self.extract_company(input).await?;

        if let Some(store) = &self.store {
            match store.lookup_symbol(&company).await {
                Ok(Some(symbol)) => {
                    debug!(company = %company, symbol = %symbol, "Resolved via ticker table");
                    return Some(ResolvedTicker::us(symbol));
                }
                Ok(None) => {}
                Err(e) => {
                    warn!(company = %company, error = %e, "Ticker table lookup failed");
                }
            }
        }

        if let Some(api) = &self.search_api {
            match api.search_ticker(&company).await {
                Ok(Some(resolved)) => {
                    debug!(company = %company, symbol = %resolved.symbol,
                           "Resolved via search-ticker API");
                    return Some(resolved);
                }
                Ok(None) => {}
                Err(e) => {
                    warn!(company = %company, error = %e, "search-ticker lookup failed");
                }
            }
        }

        debug!(company = %company, "No ticker found for company");
        None
    }

    /// Pull the company name out of the user text via the generator
    ///
    /// Returns `None` for the sentinel answer, empty output, or any answer
    /// that is clearly not a bare name.
    async fn extract_company(&self, input: &str) -> Option<String> {
        let prompt = match self.assembler.render_company_extraction(input) {
            Ok(prompt) => prompt,
            Err(e) => {
                warn!(error = %e, "Failed to render company extraction prompt");
                return None;
            }
        };

        let params = GenerationParams::default();
        let answer = match self.generator.generate(&prompt, &params, None).await {
            Ok(answer) => answer,
            Err(e) => {
                warn!(error = %e, "Company extraction failed");
                return None;
            }
        };

        let name = answer.trim();
        if name.is_empty() || name.eq_ignore_ascii_case(NO_COMPANY_SENTINEL) {
            return None;
        }
        // A bare name never spans lines; anything longer is the model
        // ignoring the instructions
        if name.lines().count() > 1 {
            warn!(answer = %name, "Company extraction produced multi-line output");
            return None;
        }
        Some(name.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use advisor_llm::{LLMError, TokenObserver};
    use async_trait::async_trait;
    use sqlx::sqlite::SqlitePoolOptions;

    struct FixedGenerator {
        answer: std::result::Result<String, String>,
    }

    #[async_trait]
    impl TextGenerator for FixedGenerator {
        async fn generate(
            &self,
            _prompt: &str,
            _params: &GenerationParams,
            _observer: Option<&dyn TokenObserver>,
        ) -> std::result::Result<String, LLMError> {
            self.answer
                .clone()
                .map_err(LLMError::RequestFailed)
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    async fn seeded_store() -> Arc<TickerStore> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(":memory:")
            .await
            .unwrap();
        sqlx::query("CREATE TABLE stock_ticker (symbol TEXT PRIMARY KEY, name TEXT NOT NULL)")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO stock_ticker (symbol, name) VALUES ('AMZN', 'Amazon')")
            .execute(&pool)
            .await
            .unwrap();
        Arc::new(TickerStore::from_pool(pool))
    }

    fn resolver(answer: std::result::Result<String, String>, store: Option<Arc<TickerStore>>) -> TickerResolver {
        TickerResolver::new(
            Arc::new(FixedGenerator { answer }),
            Arc::new(PromptAssembler::new().unwrap()),
            store,
            None,
        )
    }

    #[tokio::test]
    async fn test_resolves_known_company() {
        let store = seeded_store().await;
        let resolver = resolver(Ok("Amazon".to_string()), Some(store));
        let resolved = resolver.resolve("Is Amazon a good investment?").await.unwrap();
        assert_eq!(resolved.code(), "AMZN");
    }

    #[tokio::test]
    async fn test_sentinel_answer_yields_none() {
        let store = seeded_store().await;
        let resolver = resolver(Ok("NONE".to_string()), Some(store));
        assert!(resolver.resolve("What is a good savings rate?").await.is_none());
    }

    #[tokio::test]
    async fn test_generator_failure_yields_none() {
        let store = seeded_store().await;
        let resolver = resolver(Err("boom".to_string()), Some(store));
        assert!(resolver.resolve("Amazon").await.is_none());
    }

    #[tokio::test]
    async fn test_unknown_company_yields_none() {
        let store = seeded_store().await;
        let resolver = resolver(Ok("Acme Rockets".to_string()), Some(store));
        assert!(resolver.resolve("Tell me about Acme Rockets").await.is_none());
    }

    #[tokio::test]
    async fn test_multiline_answer_yields_none() {
        let store = seeded_store().await;
        let resolver = resolver(Ok("Amazon\nAlso Apple".to_string()), Some(store));
        assert!(resolver.resolve("Amazon and Apple?").await.is_none());
    }
}
