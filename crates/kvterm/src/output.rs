//! Output mode control.
//!
//! The [`OutputMode`] decides whether a writer bound to a standard stream
//! emits colour escape sequences and sizes its lines to the terminal.

use std::io::IsTerminal;

use console::Term;
use serde::{Deserialize, Serialize};

use crate::width::Stream;

/// Controls terminal-specific behaviour of a writer.
///
/// - `Auto` - colour and terminal width when the stream is a colour terminal
/// - `Term` - always colour; terminal width when available
/// - `Text` - never colour, always the fixed fallback width
///
/// ```rust
/// use kvterm::{OutputMode, width::Stream};
///
/// assert!(OutputMode::Term.should_use_color(Stream::Stderr));
/// assert!(!OutputMode::Text.should_use_color(Stream::Stderr));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// Detect terminal capabilities
    #[default]
    Auto,
    /// Always use ANSI escape codes
    Term,
    /// Plain text, no terminal sizing
    Text,
}

impl OutputMode {
    /// Resolves whether records written to `stream` are coloured.
    pub fn should_use_color(&self, stream: Stream) -> bool {
        match self {
            OutputMode::Auto => term_for(stream).features().colors_supported(),
            OutputMode::Term => true,
            OutputMode::Text => false,
        }
    }

    /// Resolves whether line width follows the terminal attached to `stream`.
    pub fn should_query_width(&self, stream: Stream) -> bool {
        match self {
            OutputMode::Auto | OutputMode::Term => stream_is_terminal(stream),
            OutputMode::Text => false,
        }
    }
}

/// Returns true if `stream` is an interactive terminal.
pub fn is_terminal(stream: &impl IsTerminal) -> bool {
    stream.is_terminal()
}

pub(crate) fn stream_is_terminal(stream: Stream) -> bool {
    match stream {
        Stream::Stdout => is_terminal(&std::io::stdout()),
        Stream::Stderr => is_terminal(&std::io::stderr()),
    }
}

fn term_for(stream: Stream) -> Term {
    match stream {
        Stream::Stdout => Term::stdout(),
        Stream::Stderr => Term::stderr(),
    }
}
