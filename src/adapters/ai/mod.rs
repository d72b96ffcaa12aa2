//! AI provider adapters.
//!
//! - **GroqProvider** - Groq's OpenAI-compatible chat completions API
//! - **MockAiProvider** - scripted responses for tests

mod groq_provider;
mod mock_provider;

pub use groq_provider::{GroqConfig, GroqProvider};
pub use mock_provider::MockAiProvider;
