use crate::traits::{Tool, ToolCall, ToolError, ToolResult, ToolSpec};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

/// Name-keyed tool table. Populated once at startup; shared read-only
/// (behind an `Arc`) for the rest of the session.
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
    specs: Vec<ToolSpec>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, tool: Box<dyn Tool>) -> anyhow::Result<()> {
        let name = tool.name().to_string();
        if self.tools.contains_key(&name) {
            anyhow::bail!("Tool '{}' is already registered", name);
        }

        self.specs.push(tool.spec());
        self.tools.insert(name, Arc::from(tool));
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// The catalogue advertised to the model, in registration order.
    pub fn get_specs(&self) -> &[ToolSpec] {
        &self.specs
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Runs one invocation. Unknown tools and bad arguments come back as an
    /// error result for the model to read; only collaborator failures are
    /// returned as `Err`.
    pub async fn execute(&self, call: &ToolCall) -> anyhow::Result<ToolResult> {
        match self.dispatch(call).await {
            Ok(result) => Ok(result),
            Err(e) if e.is_recoverable() => {
                warn!("Tool call {} ({}) rejected: {}", call.id, call.name, e);
                Ok(ToolResult::error(e.to_string()))
            }
            Err(e) => Err(anyhow::Error::new(e).context(format!("Tool '{}' failed", call.name))),
        }
    }

    async fn dispatch(&self, call: &ToolCall) -> Result<ToolResult, ToolError> {
        let tool = self
            .lookup(&call.name)
            .ok_or_else(|| ToolError::UnknownTool(call.name.clone()))?;

        let payload = if call.arguments.trim().is_empty() {
            "{}"
        } else {
            call.arguments.as_str()
        };
        let args: serde_json::Value = serde_json::from_str(payload).map_err(|e| {
            ToolError::invalid("arguments", format!("not valid JSON ({})", e))
        })?;
        if !args.is_object() {
            return Err(ToolError::invalid("arguments", "expected a JSON object"));
        }

        info!("Executing tool {} ({})", call.name, call.id);
        tool.execute(args).await
    }
}
