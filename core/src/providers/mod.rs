pub mod factory;
pub mod openai;

pub use factory::create_provider;
pub use openai::{GROQ_BASE_URL, OPENAI_BASE_URL, OpenAIProvider};
