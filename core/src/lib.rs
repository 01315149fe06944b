pub mod agent;
pub mod config;
pub mod ledger;
pub mod providers;
pub mod tools;
pub mod traits;

pub use agent::{AgentLoop, Channel, ContextBuilder, ConversationSession, ToolRegistry};
pub use config::*;
pub use ledger::{InMemoryLedger, JsonFileLedger, LedgerBook, create_ledger};
pub use providers::{OpenAIProvider, create_provider};
pub use tools::register_finance_tools;
pub use traits::*;
