pub mod channel;
pub mod context;
pub mod loop_;
pub mod registry;
pub mod session;

#[cfg(test)]
pub mod testing;

pub use channel::Channel;
pub use context::ContextBuilder;
pub use loop_::{AgentLoop, TERMINATION_TOKEN};
pub use registry::ToolRegistry;
pub use session::{ConversationSession, SessionError};
