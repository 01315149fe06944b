pub mod ledger;
pub mod provider;
pub mod tool;

pub use ledger::{
    AggregateRow, Aggregation, GroupKey, GroupValue, LedgerKind, LedgerRecord, LedgerStore,
    NewRecord, RecordFilter, SortOrder, UNCATEGORIZED, normalize_category,
};
pub use provider::{ChatMessage, ChatRequest, ChatResponse, Provider, Role, ToolCall};
pub use tool::{Tool, ToolError, ToolResult, ToolSpec};
