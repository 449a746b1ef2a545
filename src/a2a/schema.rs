//! Fixed JSON schemas of agent tools.
//!
//! Every agent tool takes a single `query` string and answers with a
//! single `response` string, whatever the skill. These shapes are shared
//! with other implementations and must not drift.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Input schema of every agent tool.
pub fn agent_input_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "query": {
                "type": "string",
                "description": "The message to send to the agent"
            }
        },
        "required": ["query"]
    })
}

/// Output schema of every agent tool.
pub fn agent_output_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "response": {
                "type": "string",
                "description": "The agent's response text"
            }
        }
    })
}

/// Arguments of an agent tool call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentToolArgs {
    pub query: String,
}

/// Result of an agent tool call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentToolOutput {
    pub response: String,
}
