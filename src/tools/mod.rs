//! Tool infrastructure shared by every capability.
//!
//! Descriptors describe what a model may call, the [`ToolRegistry`] holds
//! them for one conversation, and [`ToolExecutor`]s run the calls the
//! registry dispatches.

pub mod descriptor;
pub mod error;
pub mod executor;
pub mod registry;

pub use descriptor::{
    parse_tool_name, qualify_tool_name, A2AConfig, ToolDescriptor, ToolMode, NAMESPACE_SEP,
};
pub use error::{BoxError, ToolError};
pub use executor::ToolExecutor;
pub use registry::{ToolRegistry, ToolResult};
