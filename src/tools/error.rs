//! Tool registry errors.

use thiserror::Error;

/// Error type used at the executor boundary.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors raised by the [`ToolRegistry`](super::ToolRegistry).
#[derive(Debug, Error)]
pub enum ToolError {
    /// A descriptor with the same name is already registered.
    #[error("tool already registered: {0}")]
    DuplicateName(String),

    /// The descriptor failed basic validation.
    #[error("invalid tool descriptor: {0}")]
    InvalidDescriptor(String),

    /// No descriptor is registered under the requested name.
    #[error("tool {0} not found")]
    NotFound(String),

    /// No executor can handle the tool.
    #[error("executor {executor} not available for tool {tool}")]
    ExecutorUnavailable { tool: String, executor: String },
}
