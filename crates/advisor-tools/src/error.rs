//! Error types for tool execution

use thiserror::Error;

/// Result type alias for tool operations
pub type Result<T> = std::result::Result<T, ToolError>;

/// Errors that can occur when invoking tools
#[derive(Error, Debug)]
pub enum ToolError {
    /// The requested tool name is not in the registry
    #[error("unknown tool '{0}'")]
    UnknownTool(String),

    /// A registry was constructed with two tools sharing a name
    #[error("duplicate tool name '{0}'")]
    DuplicateName(String),

    /// The tool itself failed (network error, missing data, bad input)
    #[error("{0}")]
    Failed(String),
}
