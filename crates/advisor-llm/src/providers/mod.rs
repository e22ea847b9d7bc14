//! Text generation providers

#[cfg(feature = "anthropic")]
pub mod anthropic;
