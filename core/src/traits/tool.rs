use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    pub success: bool,
    pub output: String,
    pub error: Option<String>,
}

impl ToolResult {
    pub fn success(output: impl Into<String>) -> Self {
        Self {
            success: true,
            output: output.into(),
            error: None,
        }
    }

    pub fn error(error: impl Into<String>) -> Self {
        Self {
            success: false,
            output: String::new(),
            error: Some(error.into()),
        }
    }

    /// Plain text placed in the tool-role message the model reads next.
    pub fn into_content(self) -> String {
        match self.error {
            Some(error) if !self.success => format!("Error: {}", error),
            _ => self.output,
        }
    }
}

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("invalid argument '{name}': {reason}")]
    InvalidArgument { name: String, reason: String },

    #[error("tool '{0}' not found")]
    UnknownTool(String),

    /// A collaborator (the ledger) failed; not recoverable inside the turn.
    #[error(transparent)]
    Service(#[from] anyhow::Error),
}

impl ToolError {
    pub fn invalid(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Argument and lookup failures are reported back to the model as text.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Service(_))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    fn parameters_schema(&self) -> serde_json::Value;

    async fn execute(&self, args: serde_json::Value) -> Result<ToolResult, ToolError>;

    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters_schema(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_result_renders_as_error_text() {
        let content = ToolResult::error("amount is not a number").into_content();
        assert_eq!(content, "Error: amount is not a number");
    }

    #[test]
    fn success_result_renders_output() {
        assert_eq!(ToolResult::success("150 INR").into_content(), "150 INR");
    }

    #[test]
    fn service_errors_are_not_recoverable() {
        assert!(ToolError::invalid("amount", "bad").is_recoverable());
        assert!(ToolError::UnknownTool("x".into()).is_recoverable());
        assert!(!ToolError::Service(anyhow::anyhow!("disk full")).is_recoverable());
    }
}
