//! Tool trait definition

use crate::Result;
use async_trait::async_trait;

/// Trait for tools the reasoning loop can dispatch to
///
/// A tool takes the model's action input as free text and returns an
/// observation string. The description is rendered into the prompt and is
/// how the model decides when to use the tool.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Invoke the tool with the model-supplied input
    ///
    /// Errors returned here are caught at the registry boundary and turned
    /// into error observations; they never reach the controller as errors.
    async fn invoke(&self, input: &str) -> Result<String>;

    /// Get the tool's name
    ///
    /// Must be unique within a [`crate::ToolRegistry`].
    fn name(&self) -> &str;

    /// Get the tool's description for prompt rendering
    fn description(&self) -> &str;
}
