//! Ordered tool registry

use crate::{Result, Tool, ToolError};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

/// Name and description of one tool, in registration order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolSpec {
    /// Unique tool name
    pub name: String,
    /// Description rendered into the prompt
    pub description: String,
}

/// Immutable registry of the tools one controller may dispatch to
///
/// Order is insertion order; it affects prompt rendering and therefore model
/// behavior, so it must be deterministic. The registry is resolved once at
/// startup and never mutated at runtime.
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
    by_name: HashMap<String, usize>,
}

impl ToolRegistry {
    /// Build a registry from an ordered list of tools
    ///
    /// Fails if two tools share a name.
    pub fn new(tools: Vec<Arc<dyn Tool>>) -> Result<Self> {
        let mut by_name = HashMap::with_capacity(tools.len());
        for (index, tool) in tools.iter().enumerate() {
            if by_name.insert(tool.name().to_string(), index).is_some() {
                return Err(ToolError::DuplicateName(tool.name().to_string()));
            }
        }
        Ok(Self { tools, by_name })
    }

    /// Ordered tool names
    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|tool| tool.name()).collect()
    }

    /// Ordered name/description pairs for prompt rendering
    pub fn describe(&self) -> Vec<ToolSpec> {
        self.tools
            .iter()
            .map(|tool| ToolSpec {
                name: tool.name().to_string(),
                description: tool.description().to_string(),
            })
            .collect()
    }

    /// Number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Invoke a tool by name, propagating `UnknownTool` to the caller
    ///
    /// Tool-internal failures are still converted to error observations; a
    /// failing tool must produce model-visible text, not crash the loop.
    pub async fn invoke_checked(&self, name: &str, input: &str) -> Result<String> {
        let index = self
            .by_name
            .get(name)
            .copied()
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;

        let tool = &self.tools[index];
        let start = std::time::Instant::now();
        match tool.invoke(input).await {
            Ok(observation) => {
                info!(
                    tool_name = %name,
                    duration_ms = start.elapsed().as_millis() as u64,
                    observation_length = observation.len(),
                    "Tool invocation succeeded"
                );
                Ok(observation)
            }
            Err(e) => {
                warn!(
                    tool_name = %name,
                    duration_ms = start.elapsed().as_millis() as u64,
                    error = %e,
                    "Tool invocation failed"
                );
                Ok(format!("Error: {e}"))
            }
        }
    }

    /// Dispatch for the reasoning loop: every failure becomes an observation
    ///
    /// An unknown tool name is treated like a tool failure so the model sees
    /// corrective text in the next iteration.
    pub async fn dispatch(&self, name: &str, input: &str) -> String {
        match self.invoke_checked(name, input).await {
            Ok(observation) => observation,
            Err(e) => {
                warn!(tool_name = %name, error = %e, "Dispatch to unknown tool");
                format!(
                    "Error: {e}. Valid tools are: [{}]",
                    self.names().join(", ")
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct EchoTool {
        name: &'static str,
    }

    #[async_trait]
    impl Tool for EchoTool {
        async fn invoke(&self, input: &str) -> Result<String> {
            Ok(format!("echo: {input}"))
        }

        fn name(&self) -> &str {
            self.name
        }

        fn description(&self) -> &str {
            "Echoes the input back."
        }
    }

    struct FailingTool;

    #[async_trait]
    impl Tool for FailingTool {
        async fn invoke(&self, _input: &str) -> Result<String> {
            Err(ToolError::Failed("upstream unavailable".to_string()))
        }

        fn name(&self) -> &str {
            "failing"
        }

        fn description(&self) -> &str {
            "Always fails."
        }
    }

    fn registry() -> ToolRegistry {
        ToolRegistry::new(vec![
            Arc::new(EchoTool { name: "beta" }),
            Arc::new(EchoTool { name: "alpha" }),
            Arc::new(FailingTool),
        ])
        .unwrap()
    }

    #[test]
    fn test_names_preserve_insertion_order() {
        let registry = registry();
        assert_eq!(registry.names(), vec!["beta", "alpha", "failing"]);

        let specs = registry.describe();
        assert_eq!(specs[0].name, "beta");
        assert_eq!(specs[1].name, "alpha");
        assert_eq!(specs[2].description, "Always fails.");
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let result = ToolRegistry::new(vec![
            Arc::new(EchoTool { name: "dup" }) as Arc<dyn Tool>,
            Arc::new(EchoTool { name: "dup" }),
        ]);
        assert!(matches!(result, Err(ToolError::DuplicateName(name)) if name == "dup"));
    }

    #[tokio::test]
    async fn test_invoke_known_tool() {
        let registry = registry();
        let observation = registry.invoke_checked("alpha", "hello").await.unwrap();
        assert_eq!(observation, "echo: hello");
    }

    #[tokio::test]
    async fn test_invoke_unknown_tool_is_checked_error() {
        let registry = registry();
        let result = registry.invoke_checked("missing", "x").await;
        assert!(matches!(result, Err(ToolError::UnknownTool(name)) if name == "missing"));
    }

    #[tokio::test]
    async fn test_failing_tool_becomes_observation() {
        let registry = registry();
        let observation = registry.invoke_checked("failing", "x").await.unwrap();
        assert_eq!(observation, "Error: upstream unavailable");
    }

    #[tokio::test]
    async fn test_dispatch_never_errors() {
        let registry = registry();

        let ok = registry.dispatch("beta", "hi").await;
        assert_eq!(ok, "echo: hi");

        let unknown = registry.dispatch("nope", "hi").await;
        assert!(unknown.starts_with("Error: unknown tool 'nope'"));
        assert!(unknown.contains("beta, alpha, failing"));
    }
}
