//! Agents capability: exposes other agent members as `a2a__` tools.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use super::capability::{Capability, CapabilityContext, CapabilityError};
use crate::a2a::{AgentCard, AgentToolResolver, EndpointResolver, A2A_NAMESPACE};
use crate::tools::{ToolError, ToolRegistry};

/// Name of the agents capability.
pub const AGENTS_CAPABILITY: &str = A2A_NAMESPACE;

#[derive(Debug, Default)]
struct AgentsState {
    resolver: Option<AgentToolResolver>,
    prompt_tools: Vec<String>,
}

/// Registers agent tools for the members the current prompt references.
#[derive(Debug, Default)]
pub struct AgentsCapability {
    endpoint_resolver: Option<Arc<dyn EndpointResolver>>,
    cards: Option<HashMap<String, AgentCard>>,
    state: RwLock<AgentsState>,
}

impl AgentsCapability {
    /// Create an uninitialized agents capability.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to pin the endpoint resolver. Takes precedence over
    /// one shared through the capability context.
    pub fn with_endpoint_resolver(mut self, resolver: Arc<dyn EndpointResolver>) -> Self {
        self.endpoint_resolver = Some(resolver);
        self
    }

    /// Builder method to supply agent cards instead of generating them
    /// from the pack's agents section.
    pub fn with_cards(mut self, cards: HashMap<String, AgentCard>) -> Self {
        self.cards = Some(cards);
        self
    }

    /// The resolver built at init; `None` before init or without agents.
    pub fn resolver(&self) -> Option<AgentToolResolver> {
        self.state.read().resolver.clone()
    }
}

impl Capability for AgentsCapability {
    fn name(&self) -> &str {
        AGENTS_CAPABILITY
    }

    fn init(&self, ctx: &CapabilityContext<'_>) -> Result<(), CapabilityError> {
        let endpoint_resolver = self
            .endpoint_resolver
            .clone()
            .or_else(|| ctx.endpoint_resolver.clone());
        let resolver = match self.cards.as_ref() {
            Some(cards) => Some(AgentToolResolver::from_cards(cards.clone())),
            None => AgentToolResolver::new(ctx.pack),
        };
        let resolver = resolver.map(|mut resolver| {
            if let Some(endpoints) = endpoint_resolver {
                resolver.set_endpoint_resolver(endpoints);
            }
            resolver
        });
        if resolver.is_none() {
            log::debug!("Pack {} declares no agents; no agent tools", ctx.pack.id);
        }

        let prompt_tools = ctx
            .pack
            .prompt(ctx.prompt_name)
            .map(|prompt| prompt.tools.clone())
            .unwrap_or_default();

        *self.state.write() = AgentsState {
            resolver,
            prompt_tools,
        };
        Ok(())
    }

    fn register_tools(&self, registry: &mut ToolRegistry) {
        let state = self.state.read();
        let Some(resolver) = state.resolver.as_ref() else {
            return;
        };

        for descriptor in resolver.resolve_agent_tools(&state.prompt_tools) {
            let skill = descriptor
                .a2a_config
                .as_ref()
                .map(|c| c.skill_id.clone())
                .unwrap_or_default();
            match registry.register(descriptor) {
                Ok(()) => {}
                Err(ToolError::DuplicateName(name)) => {
                    log::warn!(
                        "Agent tool {} already registered; skipping skill {}",
                        name,
                        skill
                    );
                }
                Err(e) => log::warn!("Failed to register agent tool: {}", e),
            }
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
