//! Text generator trait and sampling parameters

use crate::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Sampling parameters for one generation call
///
/// Defaults are deliberately deterministic (temperature 0, top_k 1) since
/// the reasoning loop re-parses the output with a strict grammar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationParams {
    /// Maximum tokens to generate
    pub max_tokens: usize,

    /// Sampling temperature (0.0-1.0)
    pub temperature: f32,

    /// Top-k sampling cutoff
    pub top_k: u32,

    /// Nucleus sampling cutoff
    pub top_p: f32,

    /// Sequences that stop generation
    pub stop_sequences: Vec<String>,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_tokens: 4096,
            temperature: 0.0,
            top_k: 1,
            top_p: 1.0,
            stop_sequences: Vec::new(),
        }
    }
}

impl GenerationParams {
    /// Replace the stop sequences
    pub fn with_stop_sequences(mut self, sequences: Vec<String>) -> Self {
        self.stop_sequences = sequences;
        self
    }

    /// Set the sampling temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

/// Observer for streaming token delivery
///
/// Implementations receive text chunks as they arrive so a hosting UI can
/// show progress. The generator still returns the fully assembled text.
pub trait TokenObserver: Send + Sync {
    /// Called once per received text chunk
    fn on_token(&self, chunk: &str);
}

/// Trait for services that turn a prompt into text
///
/// This is the sole suspension point of the reasoning loop: one call per
/// cycle, strictly sequential within a session.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a completion for `prompt`
    ///
    /// When `observer` is provided, implementations should stream text
    /// chunks to it; correctness must not depend on streaming.
    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
        observer: Option<&dyn TokenObserver>,
    ) -> Result<String>;

    /// Provider name (e.g. "anthropic")
    fn name(&self) -> &str;
}
