//! Everything loaded once per process and shared read-only by every turn.

use docchat_config::{
    Settings, SuggestedPrompts, WorkspacePaths, load_settings, load_suggested_prompts,
    load_system_prompt,
};
use docchat_documents::{DocumentContext, load_document_context};
use tracing::info;

/// Settings, prompts and reference documents, frozen at startup.
#[derive(Debug, Clone)]
pub struct StartupContext {
    pub settings: Settings,
    pub system_prompt: String,
    pub suggestions: SuggestedPrompts,
    pub documents: DocumentContext,
    /// Every non-fatal problem hit while loading, in load order.
    pub warnings: Vec<String>,
}

impl StartupContext {
    /// Run every loader once. Never fails; problems become warnings.
    pub fn load(paths: &WorkspacePaths) -> Self {
        let settings = load_settings(&paths.settings_file());
        let system_prompt = load_system_prompt(&paths.system_prompt_file());
        let suggestions = load_suggested_prompts(&paths.suggested_prompts_file());
        let documents = load_document_context(&paths.documents_dir());

        let mut warnings = Vec::new();
        warnings.extend(settings.warnings);
        warnings.extend(system_prompt.warnings);
        warnings.extend(suggestions.warnings);
        warnings.extend(documents.warnings().iter().cloned());

        info!(
            bot = %settings.value.bot_name,
            model = %settings.value.model,
            documents = documents.loaded_files().len(),
            warnings = warnings.len(),
            "Startup context loaded"
        );

        Self {
            settings: settings.value,
            system_prompt: system_prompt.value,
            suggestions: suggestions.value,
            documents,
            warnings,
        }
    }

    /// A context built from in-memory values, with no documents.
    pub fn from_parts(settings: Settings, system_prompt: impl Into<String>) -> Self {
        Self {
            settings,
            system_prompt: system_prompt.into(),
            suggestions: SuggestedPrompts::default(),
            documents: DocumentContext::default(),
            warnings: Vec::new(),
        }
    }

    pub fn with_documents(mut self, documents: DocumentContext) -> Self {
        self.documents = documents;
        self
    }

    pub fn with_suggestions(mut self, suggestions: SuggestedPrompts) -> Self {
        self.suggestions = suggestions;
        self
    }
}
