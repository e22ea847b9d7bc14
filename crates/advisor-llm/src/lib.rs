//! Text generation layer for advisor-rs
//!
//! Defines the [`TextGenerator`] seam the reasoning loop suspends on, the
//! sampling parameters carried with each call, and an optional streaming
//! [`TokenObserver`] for progress reporting. Only the fully assembled text
//! is ever parsed by callers; streaming never affects correctness.

pub mod error;
pub mod generator;
pub mod providers;

pub use error::{LLMError, Result};
pub use generator::{GenerationParams, TextGenerator, TokenObserver};

#[cfg(feature = "anthropic")]
pub use providers::anthropic::AnthropicProvider;
