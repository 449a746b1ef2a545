//! Building the capability set for a conversation.
//!
//! Capabilities come from two places: the ones a caller passes explicitly
//! and the ones inferred from the pack's sections. The two lists are
//! merged by name, so a caller can pre-configure a capability (say, with a
//! pinned endpoint resolver) and the inferred default is dropped.

use std::collections::HashSet;
use std::sync::Arc;

use super::agents::AgentsCapability;
use super::capability::{Capability, CapabilityContext, CapabilityError};
use super::workflow::WorkflowCapability;
use crate::pack::Pack;

/// Capabilities implied by the pack: workflow when the pack declares a
/// workflow, agents when it declares at least one agent member.
pub fn infer_capabilities(pack: &Pack) -> Vec<Arc<dyn Capability>> {
    let mut caps: Vec<Arc<dyn Capability>> = Vec::new();
    if pack.has_workflow() {
        caps.push(Arc::new(WorkflowCapability::new()));
    }
    if pack.has_agents() {
        caps.push(Arc::new(AgentsCapability::new()));
    }
    caps
}

/// Merge explicit and inferred capabilities.
///
/// Explicit entries are kept as given, in order. An inferred entry is
/// appended only when no entry already included shares its name, so an
/// explicit capability always wins over the inferred default. The
/// returned handles are the same `Arc`s that were passed in.
pub fn merge_capabilities(
    explicit: &[Arc<dyn Capability>],
    inferred: &[Arc<dyn Capability>],
) -> Vec<Arc<dyn Capability>> {
    let mut seen: HashSet<String> = explicit.iter().map(|cap| cap.name().to_string()).collect();
    let mut merged: Vec<Arc<dyn Capability>> = explicit.to_vec();
    for cap in inferred {
        if seen.insert(cap.name().to_string()) {
            merged.push(Arc::clone(cap));
        } else {
            log::debug!("Dropping inferred capability {}", cap.name());
        }
    }
    merged
}

/// Initialize each capability, isolating failures.
///
/// A capability whose init fails is logged and left out of the returned
/// list; the rest carry on. Failures are returned alongside so callers can
/// surface them.
pub fn init_capabilities(
    caps: Vec<Arc<dyn Capability>>,
    ctx: &CapabilityContext<'_>,
) -> (Vec<Arc<dyn Capability>>, Vec<CapabilityError>) {
    let mut initialized = Vec::with_capacity(caps.len());
    let mut failures = Vec::new();
    for cap in caps {
        match cap.init(ctx) {
            Ok(()) => initialized.push(cap),
            Err(e) => {
                log::warn!("Capability {} failed to initialize: {}", cap.name(), e);
                failures.push(e);
            }
        }
    }
    (initialized, failures)
}

/// Close every capability, collecting errors instead of stopping at the
/// first one.
pub fn close_capabilities(caps: &[Arc<dyn Capability>]) -> Vec<CapabilityError> {
    let mut failures = Vec::new();
    for cap in caps {
        if let Err(e) = cap.close() {
            log::warn!("Capability {} failed to close: {}", cap.name(), e);
            failures.push(e);
        }
    }
    failures
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pack::{AgentDef, AgentsConfig, WorkflowSpec};
    use crate::tools::ToolRegistry;
    use std::any::Any;
    use std::collections::HashMap;

    #[derive(Debug)]
    struct Named {
        name: &'static str,
        fail_init: bool,
        fail_close: bool,
    }

    impl Named {
        fn new(name: &'static str) -> Arc<dyn Capability> {
            Arc::new(Self {
                name,
                fail_init: false,
                fail_close: false,
            })
        }

        fn failing(name: &'static str) -> Arc<dyn Capability> {
            Arc::new(Self {
                name,
                fail_init: true,
                fail_close: true,
            })
        }
    }

    impl Capability for Named {
        fn name(&self) -> &str {
            self.name
        }

        fn init(&self, _ctx: &CapabilityContext<'_>) -> Result<(), CapabilityError> {
            if self.fail_init {
                return Err(CapabilityError::Init {
                    capability: self.name.to_string(),
                    message: "boom".into(),
                });
            }
            Ok(())
        }

        fn register_tools(&self, _registry: &mut ToolRegistry) {}

        fn close(&self) -> Result<(), CapabilityError> {
            if self.fail_close {
                return Err(CapabilityError::Close {
                    capability: self.name.to_string(),
                    message: "stuck".into(),
                });
            }
            Ok(())
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    fn names(caps: &[Arc<dyn Capability>]) -> Vec<&str> {
        caps.iter().map(|c| c.name()).collect()
    }

    fn pack_with(workflow: bool, members: &[&str]) -> Pack {
        let agents = if members.is_empty() {
            None
        } else {
            Some(AgentsConfig {
                entry: members[0].to_string(),
                members: members
                    .iter()
                    .map(|m| (m.to_string(), AgentDef::default()))
                    .collect(),
            })
        };
        Pack {
            id: "p".into(),
            workflow: workflow.then(|| WorkflowSpec {
                version: 1,
                entry: "start".into(),
                states: HashMap::new(),
            }),
            agents,
            ..Default::default()
        }
    }

    #[test]
    fn test_merge_explicit_wins() {
        let explicit = vec![Named::new("workflow")];
        let inferred = vec![Named::new("workflow"), Named::new("a2a")];
        let merged = merge_capabilities(&explicit, &inferred);
        assert_eq!(names(&merged), vec!["workflow", "a2a"]);
        assert!(Arc::ptr_eq(&merged[0], &explicit[0]));
        assert!(Arc::ptr_eq(&merged[1], &inferred[1]));
    }

    #[test]
    fn test_merge_keeps_explicit_as_given() {
        let explicit = vec![Named::new("x"), Named::new("x")];
        let inferred = vec![Named::new("workflow"), Named::new("x")];
        let merged = merge_capabilities(&explicit, &inferred);
        assert_eq!(names(&merged), vec!["x", "x", "workflow"]);
        assert!(Arc::ptr_eq(&merged[1], &explicit[1]));
    }

    #[test]
    fn test_merge_length_counts_only_new_inferred_names() {
        let explicit = vec![Named::new("a2a"), Named::new("custom")];
        let inferred = vec![Named::new("workflow"), Named::new("a2a"), Named::new("workflow")];
        let merged = merge_capabilities(&explicit, &inferred);
        // Two explicit plus one inferred name not yet present.
        assert_eq!(merged.len(), 3);
        assert_eq!(names(&merged), vec!["a2a", "custom", "workflow"]);
        assert!(Arc::ptr_eq(&merged[2], &inferred[0]));
    }

    #[test]
    fn test_merge_empty() {
        assert!(merge_capabilities(&[], &[]).is_empty());
    }

    #[test]
    fn test_infer_from_sections() {
        assert!(infer_capabilities(&pack_with(false, &[])).is_empty());
        assert_eq!(
            names(&infer_capabilities(&pack_with(true, &[]))),
            vec!["workflow"]
        );
        assert_eq!(
            names(&infer_capabilities(&pack_with(false, &["helper"]))),
            vec!["a2a"]
        );
        assert_eq!(
            names(&infer_capabilities(&pack_with(true, &["a", "b"]))),
            vec!["workflow", "a2a"]
        );
    }

    #[test]
    fn test_infer_ignores_empty_agents_section() {
        let mut pack = pack_with(false, &[]);
        pack.agents = Some(AgentsConfig::default());
        assert!(infer_capabilities(&pack).is_empty());
    }

    #[test]
    fn test_init_isolates_failures() {
        let pack = Pack::default();
        let ctx = CapabilityContext::new(&pack, "chat");
        let (ok, failed) = init_capabilities(
            vec![Named::new("a"), Named::failing("b"), Named::new("c")],
            &ctx,
        );
        assert_eq!(names(&ok), vec!["a", "c"]);
        assert_eq!(failed.len(), 1);
        assert_eq!(
            failed[0].to_string(),
            "capability b init failed: boom"
        );
    }

    #[test]
    fn test_close_collects_failures() {
        let caps = vec![Named::failing("a"), Named::new("b"), Named::failing("c")];
        let failed = close_capabilities(&caps);
        assert_eq!(failed.len(), 2);
        assert!(failed[1].to_string().contains("capability c close failed"));
    }
}
