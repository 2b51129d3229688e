//! Hosted reasoning provider implementations.

pub(crate) mod anthropic;
mod openai;

pub use anthropic::AnthropicProvider;
pub use openai::OpenAiProvider;

/// Message fragments that mark a failure as a capacity problem rather
/// than a request problem.
pub(crate) fn is_capacity_signal(message: &str) -> bool {
    let lower = message.to_lowercase();
    lower.contains("credit") || lower.contains("quota") || lower.contains("rate")
}
