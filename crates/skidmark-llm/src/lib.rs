// Skidmark LLM: Claude API client implementing the roast text generator.

pub mod client;

pub use client::{ClaudeClient, LlmClient, LlmSettings};
