//! Shared utilities for advisor-rs

pub mod logging;

pub use logging::init_tracing;
