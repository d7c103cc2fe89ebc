mod mock_llm_client;
mod openai_client;

pub use mock_llm_client::{MOCK_ANALYSIS, MockLlmClient};
pub use openai_client::{DEFAULT_CHAT_MODEL, OpenAiClient};
