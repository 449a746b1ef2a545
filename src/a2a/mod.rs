//! A2A (Agent-to-Agent) tool routing.
//!
//! Agent members of a pack are exposed to each other as tools named
//! `a2a__<member>`. This module turns agent cards into those tool
//! descriptors, resolves the endpoints they point at, and executes calls
//! against in-process conversations when the members share a process.

pub mod cards;
pub mod endpoint;
pub mod errors;
pub mod executor;
pub mod resolver;
pub mod schema;
pub mod types;

/// Namespace (and executor name) reserved for agent tools.
pub const A2A_NAMESPACE: &str = "a2a";

pub use cards::generate_agent_cards;
pub use endpoint::{
    EndpointResolver, FallbackEndpointResolver, MapEndpointResolver, StaticEndpointResolver,
};
pub use errors::{A2AErrorCode, AgentToolError};
pub use executor::{AgentConversation, LocalAgentExecutor};
pub use resolver::{member_key, AgentToolResolver};
pub use schema::{agent_input_schema, agent_output_schema, AgentToolArgs, AgentToolOutput};
pub use types::{AgentCard, AgentSkill};
