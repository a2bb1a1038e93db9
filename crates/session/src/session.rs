//! The chat session: one conversation plus the shared startup context.

use std::sync::Arc;

use docchat_core::message::{Conversation, Message};
use docchat_core::provider::{CompletionRequest, Provider};
use docchat_core::ProviderError;
use docchat_config::Settings;
use tracing::{debug, info, warn};

use crate::assembler::{AssemblyMetadata, ContextBudget, PromptAssembler};
use crate::startup::StartupContext;
use crate::transcript::TranscriptLog;

/// A turn that produced no reply.
#[derive(Debug, thiserror::Error)]
pub enum TurnError {
    /// The completion call failed. The user message stays in history.
    #[error("An error occurred: {0}")]
    Completion(#[from] ProviderError),
}

impl From<TurnError> for docchat_core::Error {
    fn from(err: TurnError) -> Self {
        match err {
            TurnError::Completion(e) => docchat_core::Error::Provider(e),
        }
    }
}

/// The outcome of a successful turn.
#[derive(Debug, Clone)]
pub struct TurnReply {
    /// The assistant's reply text.
    pub content: String,
    /// Model that produced the reply.
    pub model: String,
    /// Set when the reply could not be written to the transcript log.
    pub log_warning: Option<String>,
    /// How the prompt was assembled.
    pub metadata: AssemblyMetadata,
}

/// One user's conversation with the bot.
pub struct ChatSession {
    provider: Arc<dyn Provider>,
    startup: Arc<StartupContext>,
    assembler: PromptAssembler,
    transcript: TranscriptLog,
    conversation: Conversation,
}

impl ChatSession {
    pub fn new(
        provider: Arc<dyn Provider>,
        startup: Arc<StartupContext>,
        transcript: TranscriptLog,
    ) -> Self {
        let assembler = PromptAssembler::new(ContextBudget::from_settings(&startup.settings));
        Self {
            provider,
            startup,
            assembler,
            transcript,
            conversation: Conversation::new(),
        }
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn settings(&self) -> &Settings {
        &self.startup.settings
    }

    pub fn startup(&self) -> &StartupContext {
        &self.startup
    }

    /// Suggested prompts to offer. Empty once the conversation has started.
    pub fn suggestions(&self) -> &[String] {
        if self.conversation.is_empty() {
            self.startup.suggestions.for_display()
        } else {
            &[]
        }
    }

    /// Map raw input to the message to send. While suggestions are on
    /// offer, a bare number picks the matching one (1-based).
    pub fn resolve_input(&self, input: &str) -> String {
        let trimmed = input.trim();
        let picked = trimmed
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| self.suggestions().get(i));
        match picked {
            Some(suggestion) => suggestion.clone(),
            None => trimmed.to_string(),
        }
    }

    /// Run one turn: assemble, record the user message, complete, record
    /// the reply and log it.
    ///
    /// On a completion failure the user message is kept and no reply is
    /// recorded; the session stays usable for the next turn.
    pub async fn process_turn(&mut self, text: &str) -> Result<TurnReply, TurnError> {
        let settings = &self.startup.settings;
        let payload = self.assembler.build_request(
            self.conversation.messages(),
            self.startup.documents.as_str(),
            &self.startup.system_prompt,
            text,
        );

        self.conversation.push(Message::user(text));

        let request = CompletionRequest {
            model: settings.model.clone(),
            temperature: settings.temperature,
            prompt: payload.prompt,
        };

        debug!(
            provider = self.provider.name(),
            model = %request.model,
            prompt_chars = payload.metadata.total_chars,
            history_dropped = payload.metadata.history_dropped,
            "Sending completion request"
        );

        let completion = match self.provider.complete(request).await {
            Ok(completion) => completion,
            Err(e) => {
                warn!(error = %e, "Completion failed");
                return Err(TurnError::Completion(e));
            }
        };

        self.conversation
            .push(Message::assistant(completion.text.clone()));

        let log_warning = match self.transcript.log_turn(text, &completion.text, settings) {
            Ok(_) => None,
            Err(e) => {
                warn!(error = %e, "Failed to log conversation");
                Some(format!("Failed to log conversation: {e}"))
            }
        };

        info!(
            model = %completion.model,
            messages = self.conversation.len(),
            "Turn complete"
        );

        Ok(TurnReply {
            content: completion.text,
            model: completion.model,
            log_warning,
            metadata: payload.metadata,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use docchat_core::message::Role;
    use docchat_core::provider::Completion;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays canned outcomes and records every prompt it was sent.
    struct ScriptedProvider {
        outcomes: Mutex<VecDeque<Result<String, ProviderError>>>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedProvider {
        fn new(outcomes: Vec<Result<String, ProviderError>>) -> Arc<Self> {
            Arc::new(Self {
                outcomes: Mutex::new(outcomes.into()),
                prompts: Mutex::new(Vec::new()),
            })
        }

        fn prompts(&self) -> Vec<String> {
            self.prompts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Provider for ScriptedProvider {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn complete(&self, request: CompletionRequest) -> Result<Completion, ProviderError> {
            self.prompts.lock().unwrap().push(request.prompt);
            let next = self
                .outcomes
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok("(no more script)".into()));
            next.map(|text| Completion {
                text,
                model: request.model,
                usage: None,
            })
        }
    }

    fn session_with(
        provider: Arc<ScriptedProvider>,
        settings: Settings,
        log_dir: &std::path::Path,
    ) -> ChatSession {
        let startup = StartupContext::from_parts(settings, "Be brief.");
        ChatSession::new(
            provider,
            Arc::new(startup),
            TranscriptLog::new(log_dir.join("logs").join("conversations.log")),
        )
    }

    #[tokio::test]
    async fn successful_turn_records_both_messages() {
        let tmp = tempfile::tempdir().unwrap();
        let provider = ScriptedProvider::new(vec![Ok("Hello!".into())]);
        let mut session = session_with(provider.clone(), Settings::default(), tmp.path());

        let reply = session.process_turn("Hi").await.unwrap();

        assert_eq!(reply.content, "Hello!");
        assert_eq!(reply.model, "gemini-1.5-pro");
        assert!(reply.log_warning.is_none());

        let messages = session.conversation().messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::User);
        assert_eq!(messages[0].content, "Hi");
        assert_eq!(messages[1].role, Role::Assistant);
        assert_eq!(messages[1].content, "Hello!");

        // logging off by default
        assert!(!tmp.path().join("logs").exists());
        assert!(provider.prompts()[0].starts_with("Be brief."));
    }

    #[tokio::test]
    async fn failed_turn_keeps_user_message_and_session_recovers() {
        let tmp = tempfile::tempdir().unwrap();
        let provider = ScriptedProvider::new(vec![
            Err(ProviderError::Network("connection reset".into())),
            Ok("Back online.".into()),
        ]);
        let mut session = session_with(provider.clone(), Settings::default(), tmp.path());

        let err = session.process_turn("First try").await.unwrap_err();
        assert!(err.to_string().starts_with("An error occurred"));
        let top: docchat_core::Error = err.into();
        assert!(matches!(top, docchat_core::Error::Provider(ProviderError::Network(_))));
        assert_eq!(session.conversation().len(), 1);
        assert_eq!(session.conversation().messages()[0].role, Role::User);

        let reply = session.process_turn("Second try").await.unwrap();
        assert_eq!(reply.content, "Back online.");
        assert_eq!(session.conversation().len(), 3);

        // The unanswered message is part of the next prompt's history.
        assert!(provider.prompts()[1].contains("User: First try"));
    }

    #[tokio::test]
    async fn history_is_sent_on_later_turns() {
        let tmp = tempfile::tempdir().unwrap();
        let provider = ScriptedProvider::new(vec![Ok("Paris.".into()), Ok("About 2 million.".into())]);
        let mut session = session_with(provider.clone(), Settings::default(), tmp.path());

        session.process_turn("Capital of France?").await.unwrap();
        session.process_turn("Population?").await.unwrap();

        let prompts = provider.prompts();
        assert!(!prompts[0].contains("Paris."));
        assert!(prompts[1].contains("User: Capital of France?"));
        assert!(prompts[1].contains("Assistant: Paris."));
        assert!(prompts[1].ends_with("User: Population?"));
    }

    #[tokio::test]
    async fn enabled_logging_appends_each_turn() {
        let tmp = tempfile::tempdir().unwrap();
        let settings = Settings {
            enable_logging: true,
            ..Settings::default()
        };
        let provider = ScriptedProvider::new(vec![Ok("One.".into()), Ok("Two.".into())]);
        let mut session = session_with(provider, settings, tmp.path());

        session.process_turn("1?").await.unwrap();
        session.process_turn("2?").await.unwrap();

        let log = std::fs::read_to_string(tmp.path().join("logs/conversations.log")).unwrap();
        assert_eq!(log.matches("-".repeat(50).as_str()).count(), 2);
        assert!(log.starts_with("User: 1?\nAssistant: One.\n"));
    }

    #[tokio::test]
    async fn log_failure_becomes_warning_not_error() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("logs"), "blocker").unwrap();
        let settings = Settings {
            enable_logging: true,
            ..Settings::default()
        };
        let provider = ScriptedProvider::new(vec![Ok("Still here.".into())]);
        let mut session = session_with(provider, settings, tmp.path());

        let reply = session.process_turn("Hi").await.unwrap();
        assert_eq!(reply.content, "Still here.");
        assert!(reply.log_warning.unwrap().starts_with("Failed to log conversation"));
        assert_eq!(session.conversation().len(), 2);
    }

    #[tokio::test]
    async fn suggestions_only_before_first_turn() {
        let tmp = tempfile::tempdir().unwrap();
        let provider = ScriptedProvider::new(vec![Ok("ok".into())]);
        let mut session = session_with(provider.clone(), Settings::default(), tmp.path());

        let first = session.suggestions()[0].clone();
        assert_eq!(session.suggestions().len(), 3);
        assert_eq!(session.resolve_input("1"), first);
        assert_eq!(session.resolve_input(" 9 "), "9");
        assert_eq!(session.resolve_input("0"), "0");

        let text = session.resolve_input("1");
        session.process_turn(&text).await.unwrap();
        assert!(provider.prompts()[0].ends_with(&format!("User: {first}")));

        assert!(session.suggestions().is_empty());
        assert_eq!(session.resolve_input("1"), "1");
    }

    #[tokio::test]
    async fn budget_from_settings_limits_history() {
        let tmp = tempfile::tempdir().unwrap();
        let settings = Settings {
            max_context_chars: Some(120),
            ..Settings::default()
        };
        let provider = ScriptedProvider::new(vec![
            Ok("a".repeat(40)),
            Ok("b".repeat(40)),
            Ok("done".into()),
        ]);
        let mut session = session_with(provider.clone(), settings, tmp.path());

        session.process_turn("first").await.unwrap();
        session.process_turn("second").await.unwrap();
        let reply = session.process_turn("third").await.unwrap();

        assert!(reply.metadata.history_dropped > 0);
        assert!(reply.metadata.total_chars <= 120);
        assert!(!provider.prompts()[2].contains("User: first"));
    }
}
