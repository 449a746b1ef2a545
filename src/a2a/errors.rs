//! A2A error codes and agent tool errors.
//!
//! Error codes follow JSON-RPC 2.0 conventions:
//! - -32700 to -32600: Standard JSON-RPC errors
//! - -32099 to -32000: Server errors (A2A-specific)

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::tools::BoxError;

/// A2A protocol error codes surfaced by agent tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i32)]
pub enum A2AErrorCode {
    /// Invalid method parameter(s).
    InvalidParams = -32602,
    /// Internal JSON-RPC error.
    InternalError = -32603,
    /// Task execution timed out.
    TaskTimeout = -32014,
    /// The specified skill was not found.
    SkillNotFound = -32017,
}

impl A2AErrorCode {
    /// Get the default error message for this code.
    pub fn default_message(&self) -> &'static str {
        match self {
            Self::InvalidParams => "Invalid params",
            Self::InternalError => "Internal error",
            Self::TaskTimeout => "Task execution timed out",
            Self::SkillNotFound => "Skill not found",
        }
    }
}

/// Failures of an in-process agent tool call.
#[derive(Debug, Error)]
pub enum AgentToolError {
    /// The call named a member the executor does not know.
    #[error("unknown agent member: {0}")]
    UnknownMember(String),

    /// The call arguments are not `{"query": string}`.
    #[error("failed to parse agent tool args: {0}")]
    InvalidArgs(#[source] serde_json::Error),

    /// The nested conversation turn failed.
    #[error("agent {member} failed: {source}")]
    Conversation {
        member: String,
        #[source]
        source: BoxError,
    },

    /// The call was cancelled before the agent answered.
    #[error("agent call to {0} was cancelled")]
    Cancelled(String),

    /// The agent did not answer within the configured timeout.
    #[error("agent call to {member} timed out after {timeout_ms}ms")]
    Timeout { member: String, timeout_ms: u64 },

    /// The response could not be encoded.
    #[error("failed to encode agent response: {0}")]
    Encode(#[source] serde_json::Error),
}

impl AgentToolError {
    /// The A2A error code this failure maps onto.
    pub fn code(&self) -> A2AErrorCode {
        match self {
            Self::UnknownMember(_) => A2AErrorCode::SkillNotFound,
            Self::InvalidArgs(_) => A2AErrorCode::InvalidParams,
            Self::Timeout { .. } => A2AErrorCode::TaskTimeout,
            Self::Conversation { .. } | Self::Cancelled(_) | Self::Encode(_) => {
                A2AErrorCode::InternalError
            }
        }
    }

    /// Convert to JSON-RPC error object format.
    pub fn to_dict(&self) -> Value {
        let mut error = serde_json::Map::new();
        let code = self.code();
        error.insert("code".to_string(), Value::Number((code as i32).into()));
        error.insert("message".to_string(), Value::String(self.to_string()));
        error.insert(
            "data".to_string(),
            Value::String(code.default_message().to_string()),
        );
        Value::Object(error)
    }
}
