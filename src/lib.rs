//! # Pack Capabilities
//!
//! Capability and tool-routing layer for prompt packs.
//!
//! A pack declares prompts, an optional workflow state machine and an
//! optional set of agent members. This crate infers the capabilities a
//! pack needs, turns them into tool descriptors, and routes calls:
//!
//! - `workflow__transition` lets the model trigger workflow events
//! - `a2a__<member>` lets one agent member call another, either through a
//!   remote endpoint or in-process via [`a2a::LocalAgentExecutor`]
//!
//! [`session::ToolSetup`] wires it all together for one conversation.

pub mod a2a;
pub mod capabilities;
pub mod config;
pub mod pack;
pub mod session;
pub mod tools;

pub use a2a::{AgentConversation, AgentToolResolver, LocalAgentExecutor};
pub use capabilities::{AgentsCapability, Capability, CapabilityContext, WorkflowCapability};
pub use config::{EndpointsConfig, RoutingConfig};
pub use pack::Pack;
pub use session::{SessionTools, ToolSetup};
pub use tools::{ToolDescriptor, ToolRegistry, ToolResult};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
