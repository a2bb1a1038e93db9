//! # docchat core
//!
//! Domain types, traits, and error definitions shared by every docchat crate.
//! Implementations (config loading, document extraction, the Gemini client,
//! the terminal surface) live in their own crates and depend inward on this one.

pub mod error;
pub mod message;
pub mod provider;
pub mod surface;

pub use error::{Error, ProviderError, Result};
pub use message::{Conversation, Message, Role};
pub use provider::{Completion, CompletionRequest, Provider, Usage};
pub use surface::Surface;
