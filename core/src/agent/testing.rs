//! Scripted collaborators for exercising the agent loop without I/O.

use crate::agent::Channel;
use crate::traits::{
    AggregateRow, Aggregation, ChatMessage, ChatRequest, ChatResponse, LedgerKind, LedgerRecord,
    LedgerStore, NewRecord, Provider, RecordFilter, ToolCall,
};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub messages: Vec<ChatMessage>,
    pub tool_names: Vec<String>,
    pub model: String,
}

/// Provider that replays queued responses and records every request.
#[derive(Default)]
pub struct ScriptedProvider {
    responses: Mutex<VecDeque<anyhow::Result<ChatResponse>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, text: &str) -> Self {
        self.push(Ok(ChatResponse::text(text)))
    }

    pub fn call(self, calls: &[(&str, &str, &str)]) -> Self {
        let calls = calls
            .iter()
            .map(|(id, name, args)| ToolCall::new(*id, *name, *args))
            .collect();
        self.push(Ok(ChatResponse::with_tool_calls(calls)))
    }

    pub fn fail(self, message: &str) -> Self {
        self.push(Err(anyhow::anyhow!(message.to_string())))
    }

    pub fn respond(self, response: ChatResponse) -> Self {
        self.push(Ok(response))
    }

    fn push(self, response: anyhow::Result<ChatResponse>) -> Self {
        self.responses.lock().unwrap().push_back(response);
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn chat(&self, request: ChatRequest<'_>) -> anyhow::Result<ChatResponse> {
        self.requests.lock().unwrap().push(RecordedRequest {
            messages: request.messages.to_vec(),
            tool_names: request
                .tools
                .unwrap_or_default()
                .iter()
                .map(|t| t.name.clone())
                .collect(),
            model: request.model.to_string(),
        });
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(anyhow::anyhow!("No scripted response queued")))
    }
}

/// Channel fed from a fixed list of lines.
#[derive(Default)]
pub struct ScriptedChannel {
    inputs: VecDeque<String>,
    pub replies: Vec<String>,
    pub errors: Vec<String>,
}

impl ScriptedChannel {
    pub fn new(lines: &[&str]) -> Self {
        Self {
            inputs: lines.iter().map(|l| l.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn unread(&self) -> usize {
        self.inputs.len()
    }
}

impl Channel for ScriptedChannel {
    fn read_line(&mut self) -> anyhow::Result<Option<String>> {
        Ok(self.inputs.pop_front())
    }

    fn reply(&mut self, text: &str) -> anyhow::Result<()> {
        self.replies.push(text.to_string());
        Ok(())
    }

    fn report_error(&mut self, error: &anyhow::Error) -> anyhow::Result<()> {
        self.errors.push(format!("{:#}", error));
        Ok(())
    }
}

/// Ledger whose every operation fails, standing in for an unreachable store.
pub struct UnavailableLedger;

#[async_trait]
impl LedgerStore for UnavailableLedger {
    fn name(&self) -> &str {
        "unavailable"
    }

    async fn insert(&self, _kind: LedgerKind, _record: NewRecord) -> anyhow::Result<LedgerRecord> {
        anyhow::bail!("ledger unavailable")
    }

    async fn find(
        &self,
        _kind: LedgerKind,
        _filter: &RecordFilter,
    ) -> anyhow::Result<Vec<LedgerRecord>> {
        anyhow::bail!("ledger unavailable")
    }

    async fn aggregate(
        &self,
        _kind: LedgerKind,
        _aggregation: &Aggregation,
    ) -> anyhow::Result<Vec<AggregateRow>> {
        anyhow::bail!("ledger unavailable")
    }
}
