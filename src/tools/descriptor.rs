//! Tool descriptors and qualified tool names.
//!
//! Every tool a model can call is described by a [`ToolDescriptor`]. Names
//! are namespaced as `<namespace>__<local>` so that a dispatcher can route a
//! call by its prefix alone (`a2a__summarizer` goes to the agent executor,
//! `workflow__transition` to the workflow executor).

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Separator between a namespace and the local tool name.
pub const NAMESPACE_SEP: &str = "__";

/// Split a qualified tool name on the first [`NAMESPACE_SEP`].
///
/// ```
/// use pack_capabilities::tools::parse_tool_name;
///
/// assert_eq!(parse_tool_name("a2a__weather__forecast"), ("a2a", "weather__forecast"));
/// assert_eq!(parse_tool_name("get_weather"), ("", "get_weather"));
/// ```
pub fn parse_tool_name(name: &str) -> (&str, &str) {
    match name.split_once(NAMESPACE_SEP) {
        Some((ns, local)) => (ns, local),
        None => ("", name),
    }
}

/// Join a namespace and a local name. An empty namespace yields `local`.
pub fn qualify_tool_name(namespace: &str, local: &str) -> String {
    if namespace.is_empty() {
        return local.to_string();
    }
    format!("{namespace}{NAMESPACE_SEP}{local}")
}

// ---------------------------------------------------------------------------
// ToolMode
// ---------------------------------------------------------------------------

/// Execution mode tag of a tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ToolMode {
    /// Static or scripted mock result.
    #[default]
    Mock,
    /// Live HTTP call.
    Live,
    /// Model Context Protocol server.
    Mcp,
    /// Agent-to-agent call, remote or in-process.
    A2a,
    /// Handled inside the running process (e.g. workflow transitions).
    Local,
}

impl ToolMode {
    /// The tag as it appears on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mock => "mock",
            Self::Live => "live",
            Self::Mcp => "mcp",
            Self::A2a => "a2a",
            Self::Local => "local",
        }
    }
}

impl std::fmt::Display for ToolMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ToolDescriptor
// ---------------------------------------------------------------------------

/// Protocol configuration carried by `a2a` tools.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct A2AConfig {
    /// Base URL of the agent. Empty when no endpoint could be resolved.
    #[serde(default)]
    pub agent_url: String,
    /// Skill on the agent card this tool invokes.
    #[serde(default)]
    pub skill_id: String,
    /// Upper bound for one call to this agent. Overrides the executor's
    /// own timeout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

/// A tool callable by a model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    /// Qualified name, unique within a registry.
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    pub description: String,
    /// JSON Schema of the arguments.
    pub input_schema: Value,
    /// JSON Schema of the result.
    #[serde(default)]
    pub output_schema: Value,
    #[serde(default)]
    pub mode: ToolMode,
    /// Present on `a2a` tools only.
    #[serde(default, rename = "a2a", skip_serializing_if = "Option::is_none")]
    pub a2a_config: Option<A2AConfig>,
}

impl ToolDescriptor {
    /// Create a descriptor with an empty output schema.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        input_schema: Value,
        mode: ToolMode,
    ) -> Self {
        let name = name.into();
        let (ns, _) = parse_tool_name(&name);
        let namespace = (!ns.is_empty()).then(|| ns.to_string());
        Self {
            name,
            namespace,
            description: description.into(),
            input_schema,
            output_schema: Value::Null,
            mode,
            a2a_config: None,
        }
    }

    /// Builder method to set the output schema.
    pub fn with_output_schema(mut self, schema: Value) -> Self {
        self.output_schema = schema;
        self
    }

    /// Builder method to attach the A2A protocol configuration.
    pub fn with_a2a_config(mut self, config: A2AConfig) -> Self {
        self.a2a_config = Some(config);
        self
    }
}
