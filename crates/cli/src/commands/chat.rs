//! `docchat chat`: interactive terminal session.

use docchat_channels::{TerminalInput, TerminalSurface};
use docchat_config::WorkspacePaths;
use docchat_core::Surface;

pub async fn run(paths: &WorkspacePaths) -> docchat_core::Result<()> {
    let api_key = super::require_api_key(paths)?;

    let mut surface = TerminalSurface::stdio();
    let mut session = super::open_session(paths, api_key, &mut surface)?;

    surface.show_title(&session.settings().bot_name);
    let documents = &session.startup().documents;
    if !documents.is_empty() {
        let line = format!(
            "Documents: {} loaded (~{} tokens)\n",
            documents.loaded_files().len(),
            documents.estimated_tokens()
        );
        surface.info(&line);
    }
    surface.show_suggestions(session.suggestions());

    let mut input = TerminalInput::stdin();
    surface.prompt();

    while let Some(line) = input.next_line().await {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                surface.error(&format!("Input error: {e}"));
                break;
            }
        };

        let text = session.resolve_input(&line);
        if text != line {
            surface.info(&format!("({text})"));
        }

        match session.process_turn(&text).await {
            Ok(reply) => {
                if let Some(message) = session.conversation().last() {
                    surface.show_message(message);
                }
                if let Some(warning) = &reply.log_warning {
                    surface.warn(warning);
                }
            }
            Err(e) => surface.error(&e.to_string()),
        }

        surface.prompt();
    }

    surface.info("Goodbye!");
    Ok(())
}
