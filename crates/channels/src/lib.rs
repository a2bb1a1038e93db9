//! Presentation surfaces for docchat.
//!
//! The terminal is the only surface: replies go to stdout, warnings and
//! errors to stderr, and input is read line by line from stdin.

pub mod terminal;

pub use terminal::{TerminalInput, TerminalSurface, is_exit_command};
