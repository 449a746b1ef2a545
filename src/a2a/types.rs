//! Agent card types.

use serde::{Deserialize, Serialize};

/// Default content type for agent input and output.
pub const TEXT_PLAIN: &str = "text/plain";

/// A skill advertised on an agent card.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentSkill {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(rename = "inputModes", default, skip_serializing_if = "Vec::is_empty")]
    pub input_modes: Vec<String>,
    #[serde(rename = "outputModes", default, skip_serializing_if = "Vec::is_empty")]
    pub output_modes: Vec<String>,
}

impl AgentSkill {
    /// Create a skill with the given ID and description.
    pub fn new(id: impl Into<String>, description: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            description: description.into(),
            ..Default::default()
        }
    }
}

/// An agent's advertised identity and ordered skills.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentCard {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub skills: Vec<AgentSkill>,
    #[serde(rename = "defaultInputModes", default)]
    pub default_input_modes: Vec<String>,
    #[serde(rename = "defaultOutputModes", default)]
    pub default_output_modes: Vec<String>,
}

impl AgentCard {
    /// Create a card with no skills and text-only modes.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            version: String::new(),
            skills: Vec::new(),
            default_input_modes: vec![TEXT_PLAIN.to_string()],
            default_output_modes: vec![TEXT_PLAIN.to_string()],
        }
    }

    /// Builder method to append a skill.
    pub fn with_skill(mut self, skill: AgentSkill) -> Self {
        self.skills.push(skill);
        self
    }
}
