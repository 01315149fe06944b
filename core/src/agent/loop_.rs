use crate::agent::{Channel, ConversationSession, ToolRegistry};
use crate::traits::{ChatRequest, ChatResponse, Provider};
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Typing this line at the prompt ends the session.
pub const TERMINATION_TOKEN: &str = "bye";

/// Drives a conversation: read a user line, then alternate model calls and
/// tool dispatch until the model answers without requesting tools.
///
/// Tool invocations from one assistant message run sequentially in the order
/// given, each result appended before the next call starts. There is no cap on
/// model/tool rounds within a turn.
pub struct AgentLoop {
    provider: Arc<dyn Provider>,
    tool_registry: Arc<ToolRegistry>,
    model: String,
    temperature: Option<f64>,
}

impl AgentLoop {
    pub fn new(
        provider: Arc<dyn Provider>,
        tool_registry: Arc<ToolRegistry>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            tool_registry,
            model: model.into(),
            temperature: None,
        }
    }

    pub fn with_temperature(mut self, temperature: Option<f64>) -> Self {
        self.temperature = temperature;
        self
    }

    /// Runs turns until the user sends the termination token or closes the
    /// input. A failed turn is reported on the channel and the loop keeps
    /// waiting for the next line.
    pub async fn run(
        &self,
        session: &mut ConversationSession,
        channel: &mut dyn Channel,
    ) -> Result<()> {
        while let Some(line) = channel.read_line()? {
            let line = line.trim();
            if line == TERMINATION_TOKEN {
                info!("Termination token received");
                return Ok(());
            }
            if line.is_empty() {
                continue;
            }

            match self.process_turn(session, line).await {
                Ok(reply) => channel.reply(&reply)?,
                Err(e) => {
                    error!("Turn failed: {:#}", e);
                    channel.report_error(&e)?;
                }
            }
        }

        info!("Input closed");
        Ok(())
    }

    /// Resolves one user message to the model's final text answer.
    pub async fn process_turn(
        &self,
        session: &mut ConversationSession,
        message: &str,
    ) -> Result<String> {
        session.push_user(message);

        let result = self.resolve(session).await;
        if let Err(e) = &result {
            let abandoned = session.abandon_pending(&format!("{:#}", e));
            if abandoned > 0 {
                warn!("Closed {} unanswered tool call(s) after failure", abandoned);
            }
        }
        result
    }

    async fn resolve(&self, session: &mut ConversationSession) -> Result<String> {
        let mut round = 0usize;

        loop {
            round += 1;
            let response = self.complete(session).await?;
            let text = response.text_or_empty().to_string();

            let calls = session.push_assistant(response);
            debug!(
                "Round {}: {} message(s) in transcript, {} tool call(s) requested",
                round,
                session.len(),
                calls.len()
            );

            if calls.is_empty() {
                return Ok(text);
            }

            for call in calls {
                let result = self.tool_registry.execute(&call).await?;
                session.push_tool_result(&call.id, result.into_content())?;
            }
        }
    }

    async fn complete(&self, session: &ConversationSession) -> Result<ChatResponse> {
        let tools = self.tool_registry.get_specs();
        let request = ChatRequest {
            messages: session.messages(),
            tools: if tools.is_empty() { None } else { Some(tools) },
            model: &self.model,
            temperature: self.temperature,
        };

        let response = self.provider.chat(request).await?;
        if !response.has_tool_calls() && response.text_or_empty().trim().is_empty() {
            anyhow::bail!(
                "Empty response from {}: no content or tool calls",
                self.provider.name()
            );
        }
        Ok(response)
    }
}
