//! Column measurement and terminal width providers.
//!
//! A display column is approximated as one Unicode scalar value. Wide glyphs
//! and combining marks are not treated specially, which keeps the measurement
//! cheap and predictable for log text.
//!
//! The writer asks a [`WidthSource`] for the available columns once per
//! record, so a resized terminal is picked up by the next record. A source
//! that cannot answer returns `None`, and the writer substitutes its fallback
//! width.
//!
//! ```rust
//! use kvterm::width::{display_width, FixedWidth, WidthSource};
//!
//! assert_eq!(display_width("héllo"), 5);
//! assert_eq!(FixedWidth(80).columns(), Some(80));
//!
//! // Closures are width sources too.
//! let narrow = || Some(40usize);
//! assert_eq!(narrow.columns(), Some(40));
//! ```

use std::io;

/// Width used when no terminal width is available.
pub const DEFAULT_FALLBACK_WIDTH: usize = 170;

/// Returns the number of display columns `s` occupies.
///
/// Counts Unicode scalar values. ANSI escape sequences are counted as ordinary
/// characters, so callers measure text before colouring it.
pub fn display_width(s: &str) -> usize {
    s.chars().count()
}

/// Capability that reports how many columns are available for output.
pub trait WidthSource: Send + Sync {
    /// Current usable width, or `None` if it cannot be determined.
    fn columns(&self) -> Option<usize>;
}

/// Blanket implementation for closures.
impl<F> WidthSource for F
where
    F: Fn() -> Option<usize> + Send + Sync,
{
    fn columns(&self) -> Option<usize> {
        (self)()
    }
}

/// A width that never changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedWidth(pub usize);

impl WidthSource for FixedWidth {
    fn columns(&self) -> Option<usize> {
        Some(self.0)
    }
}

/// Which standard stream to query for terminal size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Stdout,
    Stderr,
}

/// Width of the terminal attached to a standard stream.
///
/// Reports one column less than the terminal's width: some consoles insert an
/// extra line feed when a line fills the last column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalWidth {
    stream: Stream,
}

impl TerminalWidth {
    pub fn new(stream: Stream) -> Self {
        Self { stream }
    }

    pub fn stdout() -> Self {
        Self::new(Stream::Stdout)
    }

    pub fn stderr() -> Self {
        Self::new(Stream::Stderr)
    }
}

impl WidthSource for TerminalWidth {
    fn columns(&self) -> Option<usize> {
        let size = match self.stream {
            Stream::Stdout => terminal_size::terminal_size_of(io::stdout()),
            Stream::Stderr => terminal_size::terminal_size_of(io::stderr()),
        };
        size.map(|(w, _)| (w.0 as usize).saturating_sub(1))
            .filter(|w| *w > 0)
    }
}
