//! In-process routing of agent tool calls.
//!
//! When every agent member runs in the same process, an `a2a__<member>`
//! call becomes a turn on that member's conversation instead of an
//! outbound request. The [`LocalAgentExecutor`] registers under the `a2a`
//! name, so a registry routes the whole namespace to it.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::errors::AgentToolError;
use super::resolver::member_key;
use super::schema::{AgentToolArgs, AgentToolOutput};
use super::A2A_NAMESPACE;
use crate::tools::{BoxError, ToolDescriptor, ToolExecutor};

/// A conversation that can take a turn and answer with text.
///
/// Implementations decide whether concurrent turns are safe; the executor
/// adds no locking of its own.
#[async_trait]
pub trait AgentConversation: Send + Sync {
    /// Send `message` as a new user turn and wait for the full response text.
    async fn send(&self, message: &str) -> Result<String, BoxError>;
}

/// Routes agent tool calls to in-process conversations.
///
/// The executor shares the conversation handles with its creator and never
/// closes them.
#[derive(Clone)]
pub struct LocalAgentExecutor {
    members: HashMap<String, Arc<dyn AgentConversation>>,
    timeout: Option<Duration>,
}

impl fmt::Debug for LocalAgentExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut members: Vec<&String> = self.members.keys().collect();
        members.sort();
        f.debug_struct("LocalAgentExecutor")
            .field("members", &members)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl LocalAgentExecutor {
    /// Create an executor over the given member conversations.
    pub fn new(members: HashMap<String, Arc<dyn AgentConversation>>) -> Self {
        Self {
            members,
            timeout: None,
        }
    }

    /// Builder method to bound every nested turn.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Whether `name`, bare or `a2a__`-qualified, is a known member.
    pub fn has_member(&self, name: &str) -> bool {
        self.members.contains_key(member_key(name))
    }

    /// Run one agent call and return the `{"response": ...}` JSON text.
    ///
    /// Advances the target conversation by exactly one turn on success.
    pub async fn call(
        &self,
        tool_name: &str,
        args: &str,
        cancel: CancellationToken,
    ) -> Result<String, AgentToolError> {
        self.call_within(tool_name, args, self.timeout, cancel).await
    }

    async fn call_within(
        &self,
        tool_name: &str,
        args: &str,
        timeout: Option<Duration>,
        cancel: CancellationToken,
    ) -> Result<String, AgentToolError> {
        let member = member_key(tool_name);
        let conversation = self
            .members
            .get(member)
            .ok_or_else(|| AgentToolError::UnknownMember(member.to_string()))?;

        let AgentToolArgs { query } =
            serde_json::from_str(args).map_err(AgentToolError::InvalidArgs)?;

        log::debug!("Routing agent tool call to local member {}", member);
        let turn = async {
            let sent = match timeout {
                Some(limit) => tokio::time::timeout(limit, conversation.send(&query))
                    .await
                    .map_err(|_| AgentToolError::Timeout {
                        member: member.to_string(),
                        timeout_ms: limit.as_millis() as u64,
                    })?,
                None => conversation.send(&query).await,
            };
            sent.map_err(|source| AgentToolError::Conversation {
                member: member.to_string(),
                source,
            })
        };

        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(AgentToolError::Cancelled(member.to_string())),
            response = turn => response?,
        };

        serde_json::to_string(&AgentToolOutput { response }).map_err(AgentToolError::Encode)
    }
}

#[async_trait]
impl ToolExecutor for LocalAgentExecutor {
    fn name(&self) -> &str {
        A2A_NAMESPACE
    }

    async fn execute(
        &self,
        descriptor: &ToolDescriptor,
        args: &str,
        cancel: CancellationToken,
    ) -> Result<String, BoxError> {
        let timeout = descriptor
            .a2a_config
            .as_ref()
            .and_then(|config| config.timeout_ms)
            .map(Duration::from_millis)
            .or(self.timeout);
        Ok(self
            .call_within(&descriptor.name, args, timeout, cancel)
            .await?)
    }
}
