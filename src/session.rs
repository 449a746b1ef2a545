//! Per-conversation tool setup.
//!
//! [`ToolSetup`] wires a pack's capabilities into a fresh [`ToolRegistry`]
//! and hands back [`SessionTools`], which the conversation keeps for its
//! lifetime.

use std::collections::HashMap;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::a2a::{AgentConversation, AgentToolResolver, EndpointResolver, LocalAgentExecutor};
use crate::capabilities::{
    close_capabilities, infer_capabilities, init_capabilities, merge_capabilities,
    AgentsCapability, Capability, CapabilityContext, CapabilityError, WorkflowCapability,
    TRANSITION_TOOL_NAME,
};
use crate::config::RoutingConfig;
use crate::pack::Pack;
use crate::tools::{ToolError, ToolRegistry, ToolResult};

/// Builder for a conversation's tools.
///
/// # Example
///
/// ```ignore
/// let tools = ToolSetup::new(&pack, "orchestrator")
///     .with_local_agents(members)
///     .build();
/// let result = tools.execute("a2a__helper", r#"{"query":"hi"}"#, cancel).await?;
/// ```
pub struct ToolSetup<'a> {
    pack: &'a Pack,
    prompt_name: String,
    explicit: Vec<Arc<dyn Capability>>,
    endpoint_resolver: Option<Arc<dyn EndpointResolver>>,
    local_agents: Option<HashMap<String, Arc<dyn AgentConversation>>>,
    local_executor: Option<LocalAgentExecutor>,
    config: RoutingConfig,
}

impl<'a> ToolSetup<'a> {
    /// Start a setup for `prompt_name` of `pack`.
    pub fn new(pack: &'a Pack, prompt_name: impl Into<String>) -> Self {
        Self {
            pack,
            prompt_name: prompt_name.into(),
            explicit: Vec::new(),
            endpoint_resolver: None,
            local_agents: None,
            local_executor: None,
            config: RoutingConfig::default(),
        }
    }

    /// Add a pre-configured capability. It replaces any inferred
    /// capability with the same name.
    pub fn with_capability(mut self, capability: Arc<dyn Capability>) -> Self {
        self.explicit.push(capability);
        self
    }

    /// Share an endpoint resolver with every capability. Overrides the
    /// endpoints from [`with_config`](Self::with_config).
    pub fn with_endpoint_resolver(mut self, resolver: Arc<dyn EndpointResolver>) -> Self {
        self.endpoint_resolver = Some(resolver);
        self
    }

    /// Route agent tools to in-process conversations, keyed by member name.
    pub fn with_local_agents(mut self, members: HashMap<String, Arc<dyn AgentConversation>>) -> Self {
        self.local_agents = Some(members);
        self
    }

    /// Route agent tools through a ready-made executor. Takes precedence
    /// over [`with_local_agents`](Self::with_local_agents).
    pub fn with_local_executor(mut self, executor: LocalAgentExecutor) -> Self {
        self.local_executor = Some(executor);
        self
    }

    /// Builder method to set endpoints and the local agent timeout.
    pub fn with_config(mut self, config: RoutingConfig) -> Self {
        self.config = config;
        self
    }

    /// Infer, initialize and register everything the conversation needs.
    ///
    /// Capability init failures are isolated and reported through
    /// [`SessionTools::failures`]; the build itself never fails.
    pub fn build(self) -> SessionTools {
        let inferred = infer_capabilities(self.pack);
        let merged = merge_capabilities(&self.explicit, &inferred);

        let timeout = self.config.local_agent_timeout();
        let endpoint_resolver = self
            .endpoint_resolver
            .or_else(|| self.config.endpoints.into_resolver());
        let mut ctx = CapabilityContext::new(self.pack, &self.prompt_name);
        if let Some(resolver) = endpoint_resolver {
            ctx = ctx.with_endpoint_resolver(resolver);
        }
        let (capabilities, failures) = init_capabilities(merged, &ctx);

        let mut registry = ToolRegistry::new();
        for cap in &capabilities {
            cap.register_tools(&mut registry);
        }

        let local_executor = self.local_executor.or_else(|| {
            self.local_agents.map(|members| {
                let executor = LocalAgentExecutor::new(members);
                match timeout {
                    Some(limit) => executor.with_timeout(limit),
                    None => executor,
                }
            })
        });
        if let Some(executor) = local_executor {
            log::debug!("Routing agent tools in-process: {:?}", executor);
            registry.register_executor(Arc::new(executor));
        }

        let mut tools = SessionTools {
            pack_id: self.pack.id.clone(),
            registry,
            capabilities,
            failures,
            current_state: None,
        };
        if let Some(entry) = self.pack.workflow.as_ref().map(|w| w.entry.clone()) {
            tools.register_tools_for_state(&entry);
        }

        log::info!(
            "Prepared {} tools for prompt {} of pack {}",
            tools.registry.len(),
            self.prompt_name,
            tools.pack_id
        );
        tools
    }
}

/// The tools a conversation can call, plus the capabilities behind them.
#[derive(Debug)]
pub struct SessionTools {
    pack_id: String,
    registry: ToolRegistry,
    capabilities: Vec<Arc<dyn Capability>>,
    failures: Vec<CapabilityError>,
    current_state: Option<String>,
}

impl SessionTools {
    /// The registry holding the conversation's tools.
    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Initialized capabilities, explicit ones first.
    pub fn capabilities(&self) -> &[Arc<dyn Capability>] {
        &self.capabilities
    }

    /// Capabilities whose init failed during the build.
    pub fn failures(&self) -> &[CapabilityError] {
        &self.failures
    }

    /// The workflow state the transition tool was last registered for.
    pub fn current_state(&self) -> Option<&str> {
        self.current_state.as_deref()
    }

    /// The workflow capability, when the pack has a workflow.
    pub fn workflow(&self) -> Option<&WorkflowCapability> {
        self.capabilities
            .iter()
            .find_map(|cap| cap.as_any().downcast_ref::<WorkflowCapability>())
    }

    /// The agent tool resolver, when the pack has agents.
    pub fn agent_resolver(&self) -> Option<AgentToolResolver> {
        self.capabilities
            .iter()
            .find_map(|cap| cap.as_any().downcast_ref::<AgentsCapability>())
            .and_then(AgentsCapability::resolver)
    }

    /// Swap the transition tool for the one of `state_name`.
    ///
    /// The previous state's transition tool is removed first; terminal and
    /// externally orchestrated states end up with none.
    pub fn register_tools_for_state(&mut self, state_name: &str) {
        let Some(workflow) = self
            .capabilities
            .iter()
            .find_map(|cap| cap.as_any().downcast_ref::<WorkflowCapability>())
        else {
            return;
        };
        self.registry.unregister(TRANSITION_TOOL_NAME);
        workflow.register_tools_for_state_name(&mut self.registry, state_name);
        self.current_state = Some(state_name.to_string());
    }

    /// Dispatch a tool call through the registry.
    pub async fn execute(
        &self,
        name: &str,
        args: &str,
        cancel: CancellationToken,
    ) -> Result<ToolResult, ToolError> {
        self.registry.execute(name, args, cancel).await
    }

    /// Close every capability. Returns the close failures, if any.
    pub fn close(self) -> Vec<CapabilityError> {
        log::debug!("Closing capabilities for pack {}", self.pack_id);
        close_capabilities(&self.capabilities)
    }
}
