//! Token estimation utilities.
//!
//! Character-based heuristic: ~4 characters per token. Good enough to report
//! request size; the remote API remains the authority on limits.

use docchat_core::message::Message;

/// Estimate the token count for a string. Rounds up.
pub fn estimate_tokens(text: &str) -> usize {
    text.len().div_ceil(4)
}

/// Estimate tokens for a single message including its `Role: ` prefix.
pub fn estimate_message_tokens(message: &Message) -> usize {
    let overhead = 2;
    overhead + estimate_tokens(&message.content)
}

/// Estimate tokens for a slice of messages.
pub fn estimate_messages_tokens(messages: &[Message]) -> usize {
    messages.iter().map(estimate_message_tokens).sum()
}
