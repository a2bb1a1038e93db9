//! Terminal chat: reads from stdin, writes to stdout/stderr.

use std::io::{self, Write};

use docchat_core::Surface;
use docchat_core::message::{Message, Role};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::debug;

/// Words that end an interactive session.
pub fn is_exit_command(line: &str) -> bool {
    matches!(line, "exit" | "quit" | "/exit" | "/quit" | ":q")
}

/// Renders the chat as plain text.
pub struct TerminalSurface<O: Write, E: Write> {
    out: O,
    err: E,
    bot_name: String,
}

impl TerminalSurface<io::Stdout, io::Stderr> {
    pub fn stdio() -> Self {
        Self::new(io::stdout(), io::stderr())
    }
}

impl<O: Write, E: Write> TerminalSurface<O, E> {
    pub fn new(out: O, err: E) -> Self {
        Self {
            out,
            err,
            bot_name: "Assistant".into(),
        }
    }

    /// Print the input prompt without a newline.
    pub fn prompt(&mut self) {
        let _ = write!(self.out, "You > ");
        let _ = self.out.flush();
    }

    pub fn into_parts(self) -> (O, E) {
        (self.out, self.err)
    }
}

impl<O: Write, E: Write> Surface for TerminalSurface<O, E> {
    fn show_title(&mut self, bot_name: &str) {
        self.bot_name = bot_name.to_string();
        let _ = writeln!(self.out, "{bot_name}");
        let _ = writeln!(self.out, "{}", "=".repeat(bot_name.chars().count().max(3)));
        let _ = writeln!(self.out, "Type 'exit' or press Ctrl+D to leave.\n");
    }

    fn show_message(&mut self, message: &Message) {
        // User input is already on screen; only replies are echoed.
        if message.role == Role::Assistant {
            let _ = writeln!(self.out, "\n{} > {}\n", self.bot_name, message.content);
        }
    }

    fn show_suggestions(&mut self, prompts: &[String]) {
        if prompts.is_empty() {
            return;
        }
        let _ = writeln!(self.out, "Try one of these (type its number):");
        for (i, prompt) in prompts.iter().enumerate() {
            let _ = writeln!(self.out, "  {}. {prompt}", i + 1);
        }
        let _ = writeln!(self.out);
    }

    fn info(&mut self, text: &str) {
        let _ = writeln!(self.out, "  {text}");
    }

    fn warn(&mut self, text: &str) {
        let _ = writeln!(self.err, "warning: {text}");
    }

    fn error(&mut self, text: &str) {
        let _ = writeln!(self.err, "error: {text}");
    }
}

/// Lines typed by the user, read on a background task.
///
/// Blank lines are skipped. The stream ends on EOF (Ctrl+D) or an exit word.
pub struct TerminalInput {
    rx: mpsc::Receiver<io::Result<String>>,
}

impl TerminalInput {
    /// Read from the process's stdin.
    pub fn stdin() -> Self {
        Self::spawn(BufReader::new(tokio::io::stdin()))
    }

    /// Read from any line source.
    pub fn spawn<R>(reader: R) -> Self
    where
        R: AsyncBufRead + Unpin + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(32);

        tokio::spawn(async move {
            let mut lines = reader.lines();
            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => {
                        let line = line.trim().to_string();
                        if line.is_empty() {
                            continue;
                        }
                        if is_exit_command(&line) {
                            debug!("Exit command received");
                            break;
                        }
                        if tx.send(Ok(line)).await.is_err() {
                            break;
                        }
                    }
                    Ok(None) => break,
                    Err(e) => {
                        let _ = tx.send(Err(e)).await;
                        break;
                    }
                }
            }
        });

        Self { rx }
    }

    /// The next non-blank line, or `None` once the user is done.
    pub async fn next_line(&mut self) -> Option<io::Result<String>> {
        self.rx.recv().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_words() {
        for word in ["exit", "quit", "/exit", "/quit", ":q"] {
            assert!(is_exit_command(word));
        }
        assert!(!is_exit_command("exit now"));
        assert!(!is_exit_command("Quit"));
    }

    #[test]
    fn surface_renders_replies_and_suggestions() {
        let mut surface = TerminalSurface::new(Vec::new(), Vec::new());
        surface.show_title("Handbook Bot");
        surface.show_suggestions(&["What is the leave policy?".into(), "Who do I call?".into()]);
        surface.show_message(&Message::user("What is the leave policy?"));
        surface.show_message(&Message::assistant("25 days."));
        surface.info("Goodbye!");
        surface.warn("Could not load configuration file.");
        surface.error("An error occurred: timeout");

        let (out, err) = surface.into_parts();
        let out = String::from_utf8(out).unwrap();
        let err = String::from_utf8(err).unwrap();

        assert!(out.starts_with("Handbook Bot\n============\n"));
        assert!(out.contains("  1. What is the leave policy?\n  2. Who do I call?\n"));
        assert!(out.contains("Handbook Bot > 25 days."));
        assert_eq!(out.matches("What is the leave policy?").count(), 1);
        assert!(out.ends_with("  Goodbye!\n"));
        assert_eq!(
            err,
            "warning: Could not load configuration file.\nerror: An error occurred: timeout\n"
        );
    }

    #[test]
    fn empty_suggestions_print_nothing() {
        let mut surface = TerminalSurface::new(Vec::new(), Vec::new());
        surface.show_suggestions(&[]);
        let (out, _) = surface.into_parts();
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn input_skips_blanks_and_stops_at_exit() {
        let source: &'static [u8] = b"  hello  \n\n\nsecond\nquit\nnever read\n";
        let mut input = TerminalInput::spawn(BufReader::new(source));

        assert_eq!(input.next_line().await.unwrap().unwrap(), "hello");
        assert_eq!(input.next_line().await.unwrap().unwrap(), "second");
        assert!(input.next_line().await.is_none());
    }

    #[tokio::test]
    async fn input_ends_at_eof() {
        let source: &'static [u8] = b"only line";
        let mut input = TerminalInput::spawn(BufReader::new(source));

        assert_eq!(input.next_line().await.unwrap().unwrap(), "only line");
        assert!(input.next_line().await.is_none());
    }
}
