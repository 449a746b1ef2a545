//! Tool registry: descriptors plus the executors that run them.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use super::descriptor::{parse_tool_name, ToolDescriptor};
use super::error::ToolError;
use super::executor::ToolExecutor;

/// Outcome of a dispatched tool call.
///
/// Executor failures land in `error` rather than failing the dispatch, so
/// the model can see what went wrong and react.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub latency_ms: u64,
}

impl ToolResult {
    /// Whether the call produced a result.
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Holds the tools visible to a conversation and routes calls to executors.
#[derive(Debug, Default)]
pub struct ToolRegistry {
    tools: HashMap<String, ToolDescriptor>,
    executors: HashMap<String, Arc<dyn ToolExecutor>>,
}

impl ToolRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a descriptor. Names must be non-empty and unique.
    pub fn register(&mut self, descriptor: ToolDescriptor) -> Result<(), ToolError> {
        if descriptor.name.is_empty() {
            return Err(ToolError::InvalidDescriptor("tool name is required".to_string()));
        }
        if self.tools.contains_key(&descriptor.name) {
            return Err(ToolError::DuplicateName(descriptor.name));
        }
        log::debug!("Registered tool {} (mode {})", descriptor.name, descriptor.mode);
        self.tools.insert(descriptor.name.clone(), descriptor);
        Ok(())
    }

    /// Remove a descriptor, returning it if it was registered.
    pub fn unregister(&mut self, name: &str) -> Option<ToolDescriptor> {
        self.tools.remove(name)
    }

    /// Look up a descriptor by name.
    pub fn get(&self, name: &str) -> Option<&ToolDescriptor> {
        self.tools.get(name)
    }

    /// Whether a tool with this name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// All registered tool names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tools.keys().cloned().collect();
        names.sort();
        names
    }

    /// All registered descriptors, sorted by name.
    pub fn descriptors(&self) -> Vec<&ToolDescriptor> {
        let mut descriptors: Vec<&ToolDescriptor> = self.tools.values().collect();
        descriptors.sort_by(|a, b| a.name.cmp(&b.name));
        descriptors
    }

    /// Number of registered tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether no tool is registered.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Register an executor under its own name. A later executor with the
    /// same name replaces the earlier one.
    pub fn register_executor(&mut self, executor: Arc<dyn ToolExecutor>) {
        let name = executor.name().to_string();
        if self.executors.insert(name.clone(), executor).is_some() {
            log::debug!("Replaced tool executor {}", name);
        }
    }

    /// Whether an executor is registered under `name`.
    pub fn has_executor(&self, name: &str) -> bool {
        self.executors.contains_key(name)
    }

    /// Pick the executor for a descriptor: namespace first, then mode tag.
    fn executor_for(&self, descriptor: &ToolDescriptor) -> Result<&Arc<dyn ToolExecutor>, ToolError> {
        let (namespace, _) = parse_tool_name(&descriptor.name);
        if !namespace.is_empty() {
            if let Some(executor) = self.executors.get(namespace) {
                return Ok(executor);
            }
        }
        self.executors
            .get(descriptor.mode.as_str())
            .ok_or_else(|| ToolError::ExecutorUnavailable {
                tool: descriptor.name.clone(),
                executor: if namespace.is_empty() {
                    descriptor.mode.as_str().to_string()
                } else {
                    namespace.to_string()
                },
            })
    }

    /// Dispatch a call by tool name.
    pub async fn execute(
        &self,
        name: &str,
        args: &str,
        cancel: CancellationToken,
    ) -> Result<ToolResult, ToolError> {
        let descriptor = self
            .tools
            .get(name)
            .ok_or_else(|| ToolError::NotFound(name.to_string()))?;
        let executor = self.executor_for(descriptor)?;

        let start = Instant::now();
        let outcome = executor.execute(descriptor, args, cancel).await;
        let latency_ms = start.elapsed().as_millis() as u64;

        let (result, error) = match outcome {
            Ok(raw) => match serde_json::from_str::<Value>(&raw) {
                Ok(value) => (Some(value), None),
                Err(e) => (None, Some(format!("invalid tool result: {}", e))),
            },
            Err(e) => {
                log::warn!("Tool {} failed via executor {}: {}", name, executor.name(), e);
                (None, Some(e.to_string()))
            }
        };

        Ok(ToolResult {
            name: name.to_string(),
            result,
            error,
            latency_ms,
        })
    }
}
