//! Tool framework for advisor-rs
//!
//! Tools are the fixed set of named, described callables the reasoning loop
//! may dispatch to. The [`ToolRegistry`] preserves insertion order (prompt
//! rendering must be deterministic) and converts every tool failure into a
//! model-visible error observation instead of propagating it.

pub mod error;
pub mod registry;
pub mod tool;

pub use error::{Result, ToolError};
pub use registry::{ToolRegistry, ToolSpec};
pub use tool::Tool;
