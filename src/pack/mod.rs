//! Compiled pack model.
//!
//! A pack bundles prompts, an optional workflow state machine and an
//! optional set of agent members. This module only carries the shape of a
//! compiled pack; schema validation happens upstream, before a pack ever
//! reaches the capability layer.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while reading a pack.
#[derive(Debug, Error)]
pub enum PackError {
    #[error("failed to read pack: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid pack JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid pack YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The file extension is neither JSON nor YAML.
    #[error("unsupported pack format: {0}")]
    UnsupportedFormat(String),
}

// ---------------------------------------------------------------------------
// Pack
// ---------------------------------------------------------------------------

/// A compiled pack.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Pack {
    pub id: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub prompts: HashMap<String, PackPrompt>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow: Option<WorkflowSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agents: Option<AgentsConfig>,
}

impl Pack {
    /// Parse a pack from JSON text.
    pub fn from_json_str(content: &str) -> Result<Self, PackError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Parse a pack from YAML text.
    pub fn from_yaml_str(content: &str) -> Result<Self, PackError> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Read a pack from disk, picking the parser from the file extension.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, PackError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&content),
            Some("yaml") | Some("yml") => Self::from_yaml_str(&content),
            other => Err(PackError::UnsupportedFormat(
                other.unwrap_or_default().to_string(),
            )),
        }
    }

    /// Whether the pack declares a workflow section.
    pub fn has_workflow(&self) -> bool {
        self.workflow.is_some()
    }

    /// Whether the pack declares an agents section with an entry point.
    pub fn has_agents(&self) -> bool {
        self.agents
            .as_ref()
            .is_some_and(|agents| !agents.entry.is_empty())
    }

    /// Look up a prompt by name.
    pub fn prompt(&self, name: &str) -> Option<&PackPrompt> {
        self.prompts.get(name)
    }
}

/// A prompt task within a pack.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PackPrompt {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Tool names this prompt may call. Agent members appear here by name.
    #[serde(default)]
    pub tools: Vec<String>,
}

// ---------------------------------------------------------------------------
// Agents
// ---------------------------------------------------------------------------

/// Maps prompts to agent members that can call each other.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentsConfig {
    /// The member that receives external traffic.
    #[serde(default)]
    pub entry: String,
    #[serde(default)]
    pub members: HashMap<String, AgentDef>,
}

/// Agent card metadata for a single member.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentDef {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub input_modes: Vec<String>,
    #[serde(default)]
    pub output_modes: Vec<String>,
}

// ---------------------------------------------------------------------------
// Workflow
// ---------------------------------------------------------------------------

/// Who drives transitions out of a workflow state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orchestration {
    /// The model triggers transitions through the transition tool. An
    /// empty value means internal too.
    #[default]
    #[serde(alias = "")]
    Internal,
    /// An outside controller triggers transitions.
    External,
}

/// Workflow state machine declared by a pack.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkflowSpec {
    #[serde(default)]
    pub version: u32,
    pub entry: String,
    #[serde(default)]
    pub states: HashMap<String, WorkflowState>,
}

impl WorkflowSpec {
    /// Look up a state by name.
    pub fn state(&self, name: &str) -> Option<&WorkflowState> {
        self.states.get(name)
    }
}

/// One state of a workflow.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkflowState {
    #[serde(default)]
    pub prompt_task: String,
    #[serde(default)]
    pub description: String,
    /// Event name to target state.
    #[serde(default)]
    pub on_event: HashMap<String, String>,
    #[serde(default)]
    pub orchestration: Orchestration,
}

impl WorkflowState {
    /// A state with no outgoing events.
    pub fn is_terminal(&self) -> bool {
        self.on_event.is_empty()
    }

    /// Outgoing event names in lexicographic order.
    pub fn sorted_events(&self) -> Vec<String> {
        let mut events: Vec<String> = self.on_event.keys().cloned().collect();
        events.sort();
        events
    }
}
