//! Capability lifecycle contract.
//!
//! A capability is a pluggable unit of conversation behavior. It is
//! initialized once against a compiled pack, contributes tools to the
//! conversation's registry, and is closed when the conversation ends.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::a2a::EndpointResolver;
use crate::pack::Pack;
use crate::tools::ToolRegistry;

/// Errors raised by a capability's lifecycle hooks.
#[derive(Debug, Error)]
pub enum CapabilityError {
    #[error("capability {capability} init failed: {message}")]
    Init { capability: String, message: String },

    #[error("capability {capability} close failed: {message}")]
    Close { capability: String, message: String },
}

/// What a capability may read during [`Capability::init`].
///
/// The pack is borrowed read-only; capabilities copy what they need.
#[derive(Debug, Clone)]
pub struct CapabilityContext<'a> {
    pub pack: &'a Pack,
    /// The prompt the conversation runs.
    pub prompt_name: &'a str,
    /// Endpoint resolution shared by capabilities that emit remote tools.
    pub endpoint_resolver: Option<Arc<dyn EndpointResolver>>,
}

impl<'a> CapabilityContext<'a> {
    pub fn new(pack: &'a Pack, prompt_name: &'a str) -> Self {
        Self {
            pack,
            prompt_name,
            endpoint_resolver: None,
        }
    }

    /// Builder method to share an endpoint resolver.
    pub fn with_endpoint_resolver(mut self, resolver: Arc<dyn EndpointResolver>) -> Self {
        self.endpoint_resolver = Some(resolver);
        self
    }
}

/// A pluggable unit of conversation behavior.
///
/// Hooks take `&self` so a capability can be shared as
/// `Arc<dyn Capability>` between the capability set and its owner;
/// implementations keep their state behind locks.
pub trait Capability: Send + Sync + fmt::Debug {
    /// Identifier used for deduplication, e.g. `"workflow"`.
    fn name(&self) -> &str;

    /// Capture what the capability needs from the pack.
    fn init(&self, ctx: &CapabilityContext<'_>) -> Result<(), CapabilityError>;

    /// Contribute tools to a conversation's registry.
    fn register_tools(&self, registry: &mut ToolRegistry);

    /// Release resources. The default does nothing.
    fn close(&self) -> Result<(), CapabilityError> {
        Ok(())
    }

    /// Downcasting hook for callers that need the concrete type.
    fn as_any(&self) -> &dyn Any;
}
