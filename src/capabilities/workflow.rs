//! Workflow capability: the `workflow__transition` tool.
//!
//! Which transitions a model may trigger depends on the state the workflow
//! is currently in, so nothing is registered up front. The owner of the
//! workflow calls [`WorkflowCapability::register_tools_for_state`] each
//! time it enters a state.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;

use super::capability::{Capability, CapabilityContext, CapabilityError};
use crate::pack::{Orchestration, WorkflowSpec, WorkflowState};
use crate::tools::{BoxError, ToolDescriptor, ToolExecutor, ToolMode, ToolRegistry};

/// Name of the workflow capability and namespace of its tools.
pub const WORKFLOW_CAPABILITY: &str = "workflow";

/// Fixed name of the transition tool.
pub const TRANSITION_TOOL_NAME: &str = "workflow__transition";

/// Build the transition tool for a set of allowed events.
///
/// `events` is used in the given order; callers pass them sorted so the
/// schema is deterministic.
pub fn build_transition_descriptor(events: &[String]) -> ToolDescriptor {
    ToolDescriptor::new(
        TRANSITION_TOOL_NAME,
        "Transition the workflow to a new state by triggering one of the available events.",
        json!({
            "type": "object",
            "properties": {
                "event": {
                    "type": "string",
                    "enum": events,
                    "description": "The event that triggers the transition"
                },
                "context": {
                    "type": "string",
                    "description": "Summary of the relevant context to carry forward to the next state"
                }
            },
            "required": ["event", "context"]
        }),
        ToolMode::Local,
    )
    .with_output_schema(json!({
        "type": "object",
        "properties": {
            "status": { "type": "string" },
            "event": { "type": "string" },
            "target_state": { "type": "string" }
        }
    }))
}

/// A transition the model asked for, applied once its turn completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingTransition {
    pub event: String,
    #[serde(default)]
    pub context: String,
}

// ---------------------------------------------------------------------------
// WorkflowCapability
// ---------------------------------------------------------------------------

/// Outgoing events of the state whose transition tool is registered.
type Transitions = Arc<RwLock<HashMap<String, String>>>;

/// Registers the transition tool for the current workflow state.
#[derive(Debug, Default)]
pub struct WorkflowCapability {
    spec: RwLock<Option<Arc<WorkflowSpec>>>,
    transitions: Transitions,
    pending: Arc<Mutex<Option<PendingTransition>>>,
}

impl WorkflowCapability {
    /// Create an uninitialized workflow capability.
    pub fn new() -> Self {
        Self::default()
    }

    /// The workflow captured at init, if any.
    pub fn spec(&self) -> Option<Arc<WorkflowSpec>> {
        self.spec.read().clone()
    }

    /// Register the transition tool for `state`.
    ///
    /// Nothing is registered when the capability saw no workflow, when the
    /// state is absent or terminal, or when an external controller drives
    /// its transitions; the model then has no transitions to trigger.
    /// Registration conflicts are logged and swallowed so conversation
    /// setup never aborts on them, and the previous state's transitions
    /// stay in effect.
    pub fn register_tools_for_state(
        &self,
        registry: &mut ToolRegistry,
        state: Option<&WorkflowState>,
    ) {
        if self.spec().is_none() {
            return;
        }
        let Some(state) = state.filter(|s| {
            !s.is_terminal() && s.orchestration == Orchestration::Internal
        }) else {
            self.transitions.write().clear();
            return;
        };

        let descriptor = build_transition_descriptor(&state.sorted_events());
        if let Err(e) = registry.register(descriptor) {
            log::warn!("Skipping workflow transition tool: {}", e);
            return;
        }
        *self.transitions.write() = state.on_event.clone();
        if !registry.has_executor(WORKFLOW_CAPABILITY) {
            registry.register_executor(Arc::new(TransitionExecutor {
                transitions: Arc::clone(&self.transitions),
                pending: Arc::clone(&self.pending),
            }));
        }
    }

    /// Look the state up by name in the captured workflow and register its
    /// transition tool.
    pub fn register_tools_for_state_name(&self, registry: &mut ToolRegistry, state_name: &str) {
        let spec = self.spec();
        let state = spec.as_ref().and_then(|s| s.state(state_name));
        self.register_tools_for_state(registry, state);
    }

    /// Take the transition requested through the tool, if any.
    pub fn take_pending_transition(&self) -> Option<PendingTransition> {
        self.pending.lock().take()
    }
}

impl Capability for WorkflowCapability {
    fn name(&self) -> &str {
        WORKFLOW_CAPABILITY
    }

    fn init(&self, ctx: &CapabilityContext<'_>) -> Result<(), CapabilityError> {
        *self.spec.write() = ctx.pack.workflow.clone().map(Arc::new);
        Ok(())
    }

    fn register_tools(&self, _registry: &mut ToolRegistry) {
        // Transition tools are per state; see register_tools_for_state.
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// ---------------------------------------------------------------------------
// TransitionExecutor
// ---------------------------------------------------------------------------

/// Handles `workflow__transition` calls by recording the requested event.
///
/// Only events of the state whose tool is currently registered are
/// accepted.
#[derive(Debug)]
struct TransitionExecutor {
    transitions: Transitions,
    pending: Arc<Mutex<Option<PendingTransition>>>,
}

#[async_trait]
impl ToolExecutor for TransitionExecutor {
    fn name(&self) -> &str {
        WORKFLOW_CAPABILITY
    }

    async fn execute(
        &self,
        _descriptor: &ToolDescriptor,
        args: &str,
        _cancel: CancellationToken,
    ) -> Result<String, BoxError> {
        let request: PendingTransition = serde_json::from_str(args)
            .map_err(|e| format!("failed to parse transition args: {}", e))?;

        let target = self
            .transitions
            .read()
            .get(&request.event)
            .cloned()
            .ok_or_else(|| {
                format!(
                    "event {} is not available in the current state",
                    request.event
                )
            })?;

        let mut result = serde_json::Map::new();
        result.insert("status".to_string(), Value::from("transition_scheduled"));
        result.insert("event".to_string(), Value::from(request.event.clone()));
        result.insert("target_state".to_string(), Value::from(target));

        log::info!("Workflow transition scheduled: {}", request.event);
        *self.pending.lock() = Some(request);
        Ok(Value::Object(result).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pack::Pack;

    fn state(events: &[(&str, &str)], orchestration: Orchestration) -> WorkflowState {
        WorkflowState {
            prompt_task: "task".into(),
            description: String::new(),
            on_event: events
                .iter()
                .map(|(e, t)| (e.to_string(), t.to_string()))
                .collect(),
            orchestration,
        }
    }

    fn workflow_pack() -> Pack {
        let mut states = HashMap::new();
        states.insert(
            "intake".to_string(),
            state(
                &[("NeedMore", "intake"), ("InfoComplete", "processing"), ("Abort", "done")],
                Orchestration::Internal,
            ),
        );
        states.insert(
            "processing".to_string(),
            state(&[("Done", "done")], Orchestration::External),
        );
        states.insert("done".to_string(), state(&[], Orchestration::Internal));
        Pack {
            id: "wf".into(),
            workflow: Some(WorkflowSpec {
                version: 1,
                entry: "intake".into(),
                states,
            }),
            ..Default::default()
        }
    }

    fn initialized() -> WorkflowCapability {
        let pack = workflow_pack();
        let cap = WorkflowCapability::new();
        cap.init(&CapabilityContext::new(&pack, "task")).unwrap();
        cap
    }

    #[test]
    fn test_name_and_close() {
        let cap = WorkflowCapability::new();
        assert_eq!(cap.name(), "workflow");
        assert!(cap.close().is_ok());
    }

    #[test]
    fn test_register_tools_is_noop() {
        let cap = initialized();
        let mut registry = ToolRegistry::new();
        cap.register_tools(&mut registry);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_internal_state_registers_sorted_enum() {
        let cap = initialized();
        let mut registry = ToolRegistry::new();
        cap.register_tools_for_state_name(&mut registry, "intake");

        assert_eq!(registry.names(), vec![TRANSITION_TOOL_NAME]);
        let d = registry.get(TRANSITION_TOOL_NAME).unwrap();
        assert_eq!(d.mode, ToolMode::Local);
        assert_eq!(d.namespace.as_deref(), Some("workflow"));
        assert_eq!(
            d.input_schema["properties"]["event"]["enum"],
            json!(["Abort", "InfoComplete", "NeedMore"])
        );
        assert_eq!(d.input_schema["required"], json!(["event", "context"]));
        assert!(registry.has_executor("workflow"));
    }

    #[test]
    fn test_terminal_and_external_states_register_nothing() {
        let cap = initialized();
        let mut registry = ToolRegistry::new();
        cap.register_tools_for_state_name(&mut registry, "done");
        cap.register_tools_for_state_name(&mut registry, "processing");
        cap.register_tools_for_state_name(&mut registry, "missing");
        cap.register_tools_for_state(&mut registry, None);
        assert!(registry.is_empty());
        assert!(!registry.has_executor("workflow"));
    }

    #[test]
    fn test_without_workflow_is_noop() {
        let pack = Pack::default();
        let cap = WorkflowCapability::new();
        cap.init(&CapabilityContext::new(&pack, "chat")).unwrap();
        assert!(cap.spec().is_none());

        let mut registry = ToolRegistry::new();
        let s = state(&[("Go", "next")], Orchestration::Internal);
        cap.register_tools_for_state(&mut registry, Some(&s));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_duplicate_registration_is_swallowed() {
        let cap = initialized();
        let mut registry = ToolRegistry::new();
        cap.register_tools_for_state_name(&mut registry, "intake");
        cap.register_tools_for_state_name(&mut registry, "intake");
        assert_eq!(registry.len(), 1);
    }

    #[tokio::test]
    async fn test_transition_call_schedules_pending_transition() {
        let cap = initialized();
        let mut registry = ToolRegistry::new();
        cap.register_tools_for_state_name(&mut registry, "intake");

        let result = registry
            .execute(
                TRANSITION_TOOL_NAME,
                r#"{"event":"InfoComplete","context":"user gave details"}"#,
                CancellationToken::new(),
            )
            .await
            .unwrap();
        let value = result.result.unwrap();
        assert_eq!(value["status"], "transition_scheduled");
        assert_eq!(value["event"], "InfoComplete");
        assert_eq!(value["target_state"], "processing");

        assert_eq!(
            cap.take_pending_transition(),
            Some(PendingTransition {
                event: "InfoComplete".into(),
                context: "user gave details".into(),
            })
        );
        assert!(cap.take_pending_transition().is_none());
    }

    #[tokio::test]
    async fn test_shared_event_targets_current_state() {
        let mut states = HashMap::new();
        states.insert("a".to_string(), state(&[("Next", "b")], Orchestration::Internal));
        states.insert("b".to_string(), state(&[("Next", "c")], Orchestration::Internal));
        states.insert("c".to_string(), state(&[("Next", "a")], Orchestration::Internal));
        let pack = Pack {
            id: "cycle".into(),
            workflow: Some(WorkflowSpec {
                version: 1,
                entry: "a".into(),
                states,
            }),
            ..Default::default()
        };
        let cap = WorkflowCapability::new();
        cap.init(&CapabilityContext::new(&pack, "task")).unwrap();

        let mut registry = ToolRegistry::new();
        for (current, expected) in [("b", "c"), ("c", "a"), ("a", "b")] {
            registry.unregister(TRANSITION_TOOL_NAME);
            cap.register_tools_for_state_name(&mut registry, current);
            let result = registry
                .execute(
                    TRANSITION_TOOL_NAME,
                    r#"{"event":"Next","context":""}"#,
                    CancellationToken::new(),
                )
                .await
                .unwrap();
            assert_eq!(result.result.unwrap()["target_state"], expected);
        }
    }

    #[tokio::test]
    async fn test_event_outside_current_state_is_rejected() {
        let cap = initialized();
        let mut registry = ToolRegistry::new();
        cap.register_tools_for_state_name(&mut registry, "intake");

        // "Done" belongs to another state.
        let result = registry
            .execute(
                TRANSITION_TOOL_NAME,
                r#"{"event":"Done","context":"skip ahead"}"#,
                CancellationToken::new(),
            )
            .await
            .unwrap();
        assert_eq!(
            result.error.as_deref(),
            Some("event Done is not available in the current state")
        );
        assert!(cap.take_pending_transition().is_none());
    }

    #[tokio::test]
    async fn test_transition_call_with_bad_args() {
        let cap = initialized();
        let mut registry = ToolRegistry::new();
        cap.register_tools_for_state_name(&mut registry, "intake");

        let result = registry
            .execute(TRANSITION_TOOL_NAME, "{invalid", CancellationToken::new())
            .await
            .unwrap();
        assert!(result
            .error
            .unwrap()
            .starts_with("failed to parse transition args"));
        assert!(cap.take_pending_transition().is_none());
    }
}
