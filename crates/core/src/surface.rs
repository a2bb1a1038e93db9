//! Presentation surface: where the conversation is shown to the user.
//!
//! The session never prints. Startup warnings, replies and per-turn errors
//! are handed to a `Surface`, which decides how to render them.

use crate::message::Message;

/// Something that can display the chat.
pub trait Surface {
    /// Show the bot's name as the page/session header.
    fn show_title(&mut self, bot_name: &str);

    /// Render one message of the conversation.
    fn show_message(&mut self, message: &Message);

    /// Offer suggested prompts. Only called while the conversation is empty.
    fn show_suggestions(&mut self, prompts: &[String]);

    /// A status line that is not part of the conversation.
    fn info(&mut self, text: &str);

    /// A non-fatal problem (degraded config, skipped document, log failure).
    fn warn(&mut self, text: &str);

    /// A per-turn failure the user must see.
    fn error(&mut self, text: &str);
}
