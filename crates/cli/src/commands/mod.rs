pub mod ask;
pub mod chat;
pub mod doctor;
pub mod init;

use std::sync::Arc;

use docchat_config::{API_KEY_VAR, ApiKey, WorkspacePaths, resolve_api_key};
use docchat_core::Surface;
use docchat_session::{ChatSession, StartupContext, TranscriptLog};
use tracing::debug;

/// Resolve the API key or print setup instructions.
///
/// Runs before any UI so a missing key never leaves a half-drawn chat.
pub fn require_api_key(paths: &WorkspacePaths) -> docchat_core::Result<ApiKey> {
    match resolve_api_key(paths) {
        Ok(key) => Ok(key),
        Err(e) => {
            eprintln!();
            eprintln!("  ERROR: No API key configured!");
            eprintln!();
            eprintln!("  Set the environment variable:");
            eprintln!("    export {API_KEY_VAR}='...'");
            eprintln!();
            eprintln!("  Or add it to the secrets file:");
            eprintln!("    {}", paths.secrets_file().display());
            eprintln!("    {API_KEY_VAR} = \"...\"");
            eprintln!();
            eprintln!("  Get a key at: https://aistudio.google.com/app/apikey");
            eprintln!();
            Err(e.into())
        }
    }
}

/// Load everything, build the client and open a session.
pub fn open_session(
    paths: &WorkspacePaths,
    api_key: ApiKey,
    surface: &mut dyn Surface,
) -> docchat_core::Result<ChatSession> {
    debug!(root = %paths.root().display(), "Opening session");
    let startup = Arc::new(StartupContext::load(paths));
    for warning in &startup.warnings {
        surface.warn(warning);
    }

    let provider = docchat_providers::build_from_settings(&startup.settings, api_key)?;
    Ok(ChatSession::new(
        Arc::new(provider),
        startup,
        TranscriptLog::new(paths.log_file()),
    ))
}
