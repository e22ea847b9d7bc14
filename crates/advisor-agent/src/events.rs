//! Lifecycle notifications from the reasoning loop

use advisor_core::AgentResult;
use async_trait::async_trait;

/// Observer for controller lifecycle events
///
/// Handlers run inline on the loop, so implementations should be quick;
/// streaming token delivery goes through
/// [`advisor_llm::TokenObserver`] instead.
#[async_trait]
pub trait ControllerEventHandler: Send + Sync {
    /// A tool is about to be dispatched
    async fn on_tool_start(&self, tool_name: &str, input: &str);

    /// A tool dispatch returned an observation
    async fn on_tool_done(&self, tool_name: &str, observation: &str);

    /// The session terminated; fires for every terminal status
    async fn on_complete(&self, result: &AgentResult);
}

/// Handler that ignores every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpEventHandler;

#[async_trait]
impl ControllerEventHandler for NoOpEventHandler {
    async fn on_tool_start(&self, _tool_name: &str, _input: &str) {}

    async fn on_tool_done(&self, _tool_name: &str, _observation: &str) {}

    async fn on_complete(&self, _result: &AgentResult) {}
}
