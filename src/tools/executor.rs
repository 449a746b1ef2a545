//! The executor contract a registry dispatches tool calls to.

use std::fmt;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::descriptor::ToolDescriptor;
use super::error::BoxError;

/// Executes calls for a family of tools.
///
/// A registry keys executors by [`name`](ToolExecutor::name) and routes a
/// call to the executor whose name equals the tool's namespace (or, failing
/// that, its mode tag). Arguments and results are raw JSON text.
#[async_trait]
pub trait ToolExecutor: Send + Sync + fmt::Debug {
    /// Routing key of this executor, e.g. `"a2a"`.
    fn name(&self) -> &str;

    /// Run one call. `cancel` lets the caller bound the latency of the call.
    async fn execute(
        &self,
        descriptor: &ToolDescriptor,
        args: &str,
        cancel: CancellationToken,
    ) -> Result<String, BoxError>;
}
