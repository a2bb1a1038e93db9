//! Prompt assembly. Turns the startup context, the history and the new
//! message into the single prompt sent to the completion API.
//!
//! Section order is fixed:
//!
//! 1. System prompt (always)
//! 2. Document context (only when non-empty)
//! 3. Prior conversation history, oldest first
//! 4. The new user message (always)
//!
//! Assembly is deterministic: identical inputs produce identical prompts.
//!
//! # Budget
//!
//! With [`ContextBudget::Unlimited`] nothing is ever dropped and an oversized
//! request is left for the remote API to reject. With
//! [`ContextBudget::MaxChars`] the oldest history messages are dropped until
//! the prompt fits. Sections 1, 2 and 4 are never trimmed.

use docchat_config::Settings;
use docchat_core::message::{Message, Role};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::token;

const DOCUMENTS_HEADING: &str = "\n\n# Reference documents";
const HISTORY_HEADING: &str = "\n\n# Conversation so far";
const NEW_MESSAGE_HEADING: &str = "\n\n# New message\n";

/// How large the assembled prompt may grow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ContextBudget {
    /// Never truncate.
    #[default]
    Unlimited,
    /// Keep the prompt at or under this many characters by dropping the
    /// oldest history.
    MaxChars(usize),
}

impl ContextBudget {
    pub fn from_settings(settings: &Settings) -> Self {
        settings
            .max_context_chars
            .map_or(Self::Unlimited, Self::MaxChars)
    }
}

/// What the assembler produced for one turn.
#[derive(Debug, Clone)]
pub struct RequestPayload {
    /// The rendered prompt.
    pub prompt: String,
    /// Assembly metadata (sizes, drops).
    pub metadata: AssemblyMetadata,
}

/// Detailed metadata about one assembly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssemblyMetadata {
    /// History messages included in the prompt.
    pub history_included: usize,
    /// Oldest history messages left out to fit the budget.
    pub history_dropped: usize,
    /// Estimated tokens of the included history.
    pub history_tokens: usize,
    /// Characters in the final prompt.
    pub total_chars: usize,
    /// Estimated tokens in the final prompt.
    pub estimated_tokens: usize,
    /// The character budget, if any.
    pub budget_chars: Option<usize>,
    /// The never-trimmed sections alone exceed the budget.
    pub over_budget: bool,
}

/// The prompt assembler. Stateless apart from its budget; create one and reuse it.
#[derive(Debug, Clone, Default)]
pub struct PromptAssembler {
    budget: ContextBudget,
}

impl PromptAssembler {
    pub fn new(budget: ContextBudget) -> Self {
        Self { budget }
    }

    pub fn budget(&self) -> ContextBudget {
        self.budget
    }

    /// Assemble the prompt for one turn. `history` is the conversation before
    /// `new_user_message` is appended.
    pub fn build_request(
        &self,
        history: &[Message],
        document_context: &str,
        system_prompt: &str,
        new_user_message: &str,
    ) -> RequestPayload {
        let mut head = String::with_capacity(system_prompt.len() + document_context.len() + 32);
        head.push_str(system_prompt);
        if !document_context.is_empty() {
            head.push_str(DOCUMENTS_HEADING);
            head.push_str(document_context);
        }

        let mut tail = String::from(NEW_MESSAGE_HEADING);
        tail.push_str(&history_line(Role::User, new_user_message));

        let fixed_chars = char_len(&head) + char_len(&tail);
        let (start, over_budget) = match self.budget {
            ContextBudget::Unlimited => (0, false),
            ContextBudget::MaxChars(max) => first_kept_message(history, fixed_chars, max),
        };
        let kept = &history[start..];

        let mut prompt = head;
        if !kept.is_empty() {
            prompt.push_str(HISTORY_HEADING);
            for message in kept {
                prompt.push('\n');
                prompt.push_str(&history_line(message.role, &message.content));
            }
        }
        prompt.push_str(&tail);

        let metadata = AssemblyMetadata {
            history_included: kept.len(),
            history_dropped: start,
            history_tokens: token::estimate_messages_tokens(kept),
            total_chars: char_len(&prompt),
            estimated_tokens: token::estimate_tokens(&prompt),
            budget_chars: match self.budget {
                ContextBudget::Unlimited => None,
                ContextBudget::MaxChars(max) => Some(max),
            },
            over_budget,
        };

        debug!(
            included = metadata.history_included,
            dropped = metadata.history_dropped,
            chars = metadata.total_chars,
            "Prompt assembled"
        );

        RequestPayload { prompt, metadata }
    }
}

/// Assemble without any budget.
pub fn build_request(
    history: &[Message],
    document_context: &str,
    system_prompt: &str,
    new_user_message: &str,
) -> RequestPayload {
    PromptAssembler::default().build_request(
        history,
        document_context,
        system_prompt,
        new_user_message,
    )
}

fn history_line(role: Role, content: &str) -> String {
    format!("{}: {content}", role.label())
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Index of the oldest history message to keep so the prompt fits `max`.
///
/// Kept history never starts on an assistant reply, so a turn is not split
/// from its question.
fn first_kept_message(history: &[Message], fixed_chars: usize, max: usize) -> (usize, bool) {
    if fixed_chars > max {
        return (history.len(), true);
    }

    // Cost of each message as rendered: "\n" + "Role: content".
    let costs: Vec<usize> = history
        .iter()
        .map(|m| 1 + char_len(&history_line(m.role, &m.content)))
        .collect();
    let heading = char_len(HISTORY_HEADING);

    let mut start = 0;
    let mut history_chars: usize = costs.iter().sum();
    while start < history.len() && fixed_chars + heading + history_chars > max {
        history_chars -= costs[start];
        start += 1;
    }
    while start < history.len() && history[start].role == Role::Assistant {
        start += 1;
    }

    (start, false)
}
