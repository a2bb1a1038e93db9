//! `docchat ask`: one message, one reply on stdout.

use docchat_channels::TerminalSurface;
use docchat_config::WorkspacePaths;
use docchat_core::Surface;

pub async fn run(paths: &WorkspacePaths, message: &str) -> docchat_core::Result<()> {
    let api_key = super::require_api_key(paths)?;

    let mut surface = TerminalSurface::stdio();
    let mut session = super::open_session(paths, api_key, &mut surface)?;

    let reply = session.process_turn(message).await?;
    if let Some(warning) = &reply.log_warning {
        surface.warn(warning);
    }
    println!("{}", reply.content);

    Ok(())
}
