//! Turn processing for docchat.
//!
//! Each turn follows the same path:
//!
//! 1. **Assemble** system prompt + document context + history + new message
//! 2. **Record** the user message in the session's conversation
//! 3. **Complete** through the configured provider
//! 4. **Record** the reply and mirror the turn into the transcript log
//!
//! Startup inputs are loaded once into a [`StartupContext`] and shared
//! read-only; the conversation lives on an explicit [`ChatSession`].

pub mod assembler;
pub mod session;
pub mod startup;
pub mod token;
pub mod transcript;

pub use assembler::{AssemblyMetadata, ContextBudget, PromptAssembler, RequestPayload, build_request};
pub use session::{ChatSession, TurnError, TurnReply};
pub use startup::StartupContext;
pub use transcript::{TranscriptError, TranscriptLog};
