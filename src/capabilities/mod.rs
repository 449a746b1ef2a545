//! # Capabilities
//!
//! Pluggable conversation behavior inferred from a pack's sections.
//!
//! ## Resolution Flow
//!
//! 1. `infer_capabilities(pack)` picks capabilities from the pack sections
//! 2. `merge_capabilities(explicit, inferred)` dedups by name, explicit first
//! 3. `init_capabilities(caps, ctx)` initializes each one, isolating failures
//! 4. `Capability::register_tools` contributes tools to the registry
//! 5. `WorkflowCapability::register_tools_for_state` runs on every state entry

pub mod agents;
pub mod capability;
pub mod set;
pub mod workflow;

pub use agents::{AgentsCapability, AGENTS_CAPABILITY};
pub use capability::{Capability, CapabilityContext, CapabilityError};
pub use set::{close_capabilities, infer_capabilities, init_capabilities, merge_capabilities};
pub use workflow::{
    build_transition_descriptor, PendingTransition, WorkflowCapability, TRANSITION_TOOL_NAME,
    WORKFLOW_CAPABILITY,
};
