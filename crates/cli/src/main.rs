//! docchat CLI: the main entry point.
//!
//! Commands:
//! - `chat`    Interactive chat (the default)
//! - `ask`     Send one message and print the reply
//! - `init`    Write starter config files
//! - `doctor`  Diagnose the workspace

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use docchat_config::WorkspacePaths;

mod commands;

#[derive(Parser)]
#[command(
    name = "docchat",
    about = "docchat: chat with your documents through the Gemini API",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Directory holding config/, documents/ and logs/
    #[arg(long, env = "DOCCHAT_ROOT", global = true)]
    root: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Chat interactively
    Chat,

    /// Send a single message and print the reply
    Ask {
        /// The message to send
        message: String,
    },

    /// Write default config files and create the documents directory
    Init,

    /// Report configuration, documents and credential status
    Doctor,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr so they never interleave with the chat on stdout.
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let paths = match cli.root {
        Some(root) => WorkspacePaths::new(root),
        None => WorkspacePaths::current_dir(),
    };

    let outcome = match cli.command.unwrap_or(Commands::Chat) {
        Commands::Chat => commands::chat::run(&paths).await,
        Commands::Ask { message } => commands::ask::run(&paths, &message).await,
        Commands::Init => commands::init::run(&paths),
        Commands::Doctor => commands::doctor::run(&paths),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
