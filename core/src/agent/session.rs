//! The transcript of one conversation.
//!
//! Messages are only ever appended. Every tool-role message must answer an
//! invocation issued by an earlier assistant message, and each invocation is
//! answered at most once.

use crate::traits::{ChatMessage, ChatResponse, ToolCall};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("tool result '{0}' does not answer any pending invocation")]
    UnmatchedToolResult(String),

    #[error("invocation '{0}' was already answered")]
    DuplicateToolResult(String),
}

#[derive(Debug, Clone)]
pub struct ConversationSession {
    messages: Vec<ChatMessage>,
    pending: Vec<String>,
    answered: Vec<String>,
}

impl ConversationSession {
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            messages: vec![ChatMessage::system(system_prompt)],
            pending: vec![],
            answered: vec![],
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    /// Invocations issued by the model that have no tool result yet.
    pub fn pending_calls(&self) -> &[String] {
        &self.pending
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.messages.push(ChatMessage::user(content));
    }

    /// Appends the model's reply verbatim and returns the invocations it
    /// requested, in order.
    pub fn push_assistant(&mut self, response: ChatResponse) -> Vec<ToolCall> {
        let message = response.into_message();
        let calls = message.invocations().to_vec();
        self.pending.extend(calls.iter().map(|c| c.id.clone()));
        self.messages.push(message);
        calls
    }

    pub fn push_tool_result(
        &mut self,
        tool_call_id: &str,
        content: impl Into<String>,
    ) -> Result<(), SessionError> {
        match self.pending.iter().position(|id| id == tool_call_id) {
            Some(index) => {
                self.pending.remove(index);
            }
            None if self.answered.iter().any(|id| id == tool_call_id) => {
                return Err(SessionError::DuplicateToolResult(tool_call_id.to_string()));
            }
            None => return Err(SessionError::UnmatchedToolResult(tool_call_id.to_string())),
        }

        self.answered.push(tool_call_id.to_string());
        self.messages
            .push(ChatMessage::tool_result(tool_call_id, content));
        Ok(())
    }

    /// Answers every outstanding invocation with `reason`, keeping the
    /// transcript well-formed after a turn is cut short.
    pub fn abandon_pending(&mut self, reason: &str) -> usize {
        let pending = std::mem::take(&mut self.pending);
        let count = pending.len();
        for id in pending {
            self.messages.push(ChatMessage::tool_result(
                id.clone(),
                format!("Error: turn aborted before this call completed: {}", reason),
            ));
            self.answered.push(id);
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::Role;

    fn calls() -> ChatResponse {
        ChatResponse::with_tool_calls(vec![
            ToolCall::new("a", "addExpense", "{}"),
            ToolCall::new("b", "getTotalExpense", "{}"),
        ])
    }

    #[test]
    fn starts_with_system_message() {
        let session = ConversationSession::new("be helpful");
        assert_eq!(session.len(), 1);
        assert_eq!(session.messages()[0].role, Role::System);
    }

    #[test]
    fn tool_results_must_match_pending_calls() {
        let mut session = ConversationSession::new("sys");
        session.push_user("hi");
        assert_eq!(
            session.push_tool_result("a", "x"),
            Err(SessionError::UnmatchedToolResult("a".into()))
        );

        let requested = session.push_assistant(calls());
        assert_eq!(requested.len(), 2);
        assert_eq!(session.pending_calls(), ["a", "b"]);

        session.push_tool_result("b", "done").unwrap();
        assert_eq!(
            session.push_tool_result("b", "again"),
            Err(SessionError::DuplicateToolResult("b".into()))
        );
        session.push_tool_result("a", "done").unwrap();
        assert!(session.pending_calls().is_empty());
        assert_eq!(session.len(), 5);
    }

    #[test]
    fn abandon_answers_every_pending_call() {
        let mut session = ConversationSession::new("sys");
        session.push_assistant(calls());
        session.push_tool_result("a", "ok").unwrap();

        assert_eq!(session.abandon_pending("service down"), 1);
        let last = session.last().unwrap();
        assert_eq!(last.tool_call_id.as_deref(), Some("b"));
        assert!(last.content.contains("service down"));
        assert!(session.pending_calls().is_empty());
        assert_eq!(session.abandon_pending("again"), 0);
    }
}
