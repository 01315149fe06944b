use crate::agent::ConversationSession;
use crate::traits::ToolSpec;
use chrono::{DateTime, Local};
use std::fmt::Write;

pub struct ContextBuilder {
    pub assistant_name: String,
    pub currency: String,
    pub tool_specs: Vec<ToolSpec>,
    pub now: Option<DateTime<Local>>,
}

impl ContextBuilder {
    pub fn new(assistant_name: impl Into<String>) -> Self {
        Self {
            assistant_name: assistant_name.into(),
            currency: "INR".to_string(),
            tool_specs: vec![],
            now: None,
        }
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    pub fn with_tool_specs(mut self, tool_specs: Vec<ToolSpec>) -> Self {
        self.tool_specs = tool_specs;
        self
    }

    /// Pins the timestamp embedded in the prompt.
    pub fn with_now(mut self, now: DateTime<Local>) -> Self {
        self.now = Some(now);
        self
    }

    pub fn build_system_prompt(&self) -> String {
        let mut parts = vec![self.get_identity()];

        if let Some(tools) = self.get_tool_overview() {
            parts.push(tools);
        }

        parts.push(self.get_runtime_context());
        parts.join("\n\n")
    }

    /// A fresh session seeded with the system prompt.
    pub fn start_session(&self) -> ConversationSession {
        ConversationSession::new(self.build_system_prompt())
    }

    fn get_identity(&self) -> String {
        format!(
            "You are {}, a personal finance assistant. Your task is to assist the user with their expenses, balances and financial planning.\n\
             Amounts are in {}. Use the tools to read or change the ledger; never invent figures.",
            self.assistant_name, self.currency
        )
    }

    fn get_tool_overview(&self) -> Option<String> {
        if self.tool_specs.is_empty() {
            return None;
        }

        let mut overview = String::from("You have access to the following tools:\n");
        for (index, tool) in self.tool_specs.iter().enumerate() {
            let params = tool
                .parameters
                .get("properties")
                .and_then(|p| p.as_object())
                .map(|props| props.keys().cloned().collect::<Vec<_>>().join(", "))
                .unwrap_or_default();
            let _ = writeln!(
                overview,
                "{}. {}({{{}}}): string // {}",
                index + 1,
                tool.name,
                params,
                tool.description
            );
        }

        Some(overview.trim_end().to_string())
    }

    fn get_runtime_context(&self) -> String {
        let now = self.now.unwrap_or_else(Local::now);
        format!("current datetime: {}", now.format("%Y-%m-%d %H:%M:%S %:z (%A)"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn spec(name: &str) -> ToolSpec {
        ToolSpec {
            name: name.to_string(),
            description: "Get total expense from date to date.".to_string(),
            parameters: json!({
                "type": "object",
                "properties": {"from": {"type": "string"}, "to": {"type": "string"}}
            }),
        }
    }

    #[test]
    fn prompt_embeds_name_tools_and_time() {
        let now = Local.with_ymd_and_hms(2024, 5, 17, 10, 30, 0).unwrap();
        let prompt = ContextBuilder::new("Vasu")
            .with_tool_specs(vec![spec("getTotalExpense")])
            .with_now(now)
            .build_system_prompt();

        assert!(prompt.starts_with("You are Vasu"));
        assert!(prompt.contains("1. getTotalExpense({from, to}): string"));
        assert!(prompt.contains("current datetime: 2024-05-17 10:30:00"));
    }

    #[test]
    fn no_tools_no_tool_section() {
        let prompt = ContextBuilder::new("Vasu").build_system_prompt();
        assert!(!prompt.contains("following tools"));
    }

    #[test]
    fn session_is_seeded_with_prompt() {
        let builder = ContextBuilder::new("Vasu").with_currency("USD");
        let session = builder.start_session();
        assert_eq!(session.len(), 1);
        assert!(session.messages()[0].content.contains("Amounts are in USD"));
    }
}
