//! Error types for prompt assembly

use thiserror::Error;

/// Result type alias for prompt operations
pub type Result<T> = std::result::Result<T, PromptError>;

/// Errors from template parsing and rendering
#[derive(Error, Debug)]
pub enum PromptError {
    /// A bundled template failed to parse
    #[error("Template '{name}' failed to parse: {detail}")]
    TemplateParseFailed {
        /// Template name
        name: String,
        /// Engine error detail
        detail: String,
    },

    /// Rendering a template failed
    #[error("Template '{name}' failed to render: {detail}")]
    RenderFailed {
        /// Template name
        name: String,
        /// Engine error detail
        detail: String,
    },
}
