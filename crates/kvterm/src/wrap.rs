//! Column-budget line layout.
//!
//! [`LineLayout`] accumulates one record's output while tracking the current
//! display column. Message text is placed word by word and key/value pairs
//! pair by pair; whenever the next piece would push the line past the width,
//! the line is broken and continued after the indent.
//!
//! Words are split by [`Tokens`]:
//!
//! - a run of whitespace before a word is worth a single space, however long
//!   it was in the input;
//! - a word is a run of characters that are neither whitespace nor `,`;
//! - a non-whitespace character directly after a word (in practice a comma)
//!   stays attached to it, so a continuation line never starts with
//!   punctuation, while long comma-separated runs without spaces can still
//!   be broken between items.
//!
//! In colour mode, words starting with a severity marker are wrapped in a red
//! escape sequence. Escape bytes never count toward the column.
//!
//! ```rust
//! use kvterm::wrap::LineLayout;
//!
//! let mut layout = LineLayout::new("", "    ", 13, None);
//! layout.push_wrapped("the quick brown fox");
//! assert_eq!(layout.finish(), "the quick\n    brown fox\n");
//! ```

use crate::markers::Markers;
use crate::width::display_width;

/// Sets the foreground colour to red.
pub const SEVERITY_START: &str = "\x1b[0;31m";

/// Resets all attributes.
pub const SEVERITY_END: &str = "\x1b[0m";

/// One unit of wrapped message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    /// Whitespace preceded the word in the input.
    pub space_before: bool,
    /// The word itself, without trailing punctuation.
    pub word: &'a str,
    /// Punctuation attached after the word.
    pub punct: Option<char>,
}

impl Token<'_> {
    /// Display columns of the word plus its punctuation, excluding the space.
    pub fn width(&self) -> usize {
        display_width(self.word) + usize::from(self.punct.is_some())
    }
}

/// Iterator splitting message text into [`Token`]s.
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    rest: &'a str,
}

impl<'a> Tokens<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { rest: text }
    }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        let trimmed = self.rest.trim_start();
        let space_before = trimmed.len() != self.rest.len();
        self.rest = trimmed;
        if self.rest.is_empty() {
            return None;
        }

        let word_end = self
            .rest
            .find(|c: char| c.is_whitespace() || c == ',')
            .unwrap_or(self.rest.len());
        let (word, rest) = self.rest.split_at(word_end);
        self.rest = rest;

        let mut punct = None;
        if let Some(c) = self.rest.chars().next() {
            if !c.is_whitespace() {
                punct = Some(c);
                self.rest = &self.rest[c.len_utf8()..];
            }
        }

        Some(Token {
            space_before,
            word,
            punct,
        })
    }
}

/// Output buffer for one record with a running column counter.
#[derive(Debug)]
pub struct LineLayout<'a> {
    buf: String,
    width: usize,
    indent: &'a str,
    indent_width: usize,
    col: usize,
    // Nothing but the header or indent on the current line yet.
    line_empty: bool,
    need_space: bool,
    highlight: Option<&'a Markers>,
}

impl<'a> LineLayout<'a> {
    /// Starts a layout whose first line begins with `prefix`.
    ///
    /// `indent` starts every continuation line. Severity highlighting is
    /// applied when `highlight` is given.
    pub fn new(
        prefix: &str,
        indent: &'a str,
        width: usize,
        highlight: Option<&'a Markers>,
    ) -> Self {
        let mut buf = String::with_capacity(prefix.len() + 128);
        buf.push_str(prefix);
        Self {
            buf,
            width,
            indent,
            indent_width: display_width(indent),
            col: display_width(prefix),
            line_empty: true,
            need_space: false,
            highlight,
        }
    }

    /// Current display column, excluding escape sequences.
    pub fn column(&self) -> usize {
        self.col
    }

    /// Configured line width.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Appends message text word by word, breaking lines as needed.
    pub fn push_wrapped(&mut self, text: &str) {
        for token in Tokens::new(text) {
            let mut space = token.space_before;
            if self.overflows(token.width() + usize::from(space)) {
                self.break_line();
                space = false;
            }
            if space {
                self.buf.push(' ');
                self.col += 1;
            }
            self.push_word(token.word);
            if let Some(p) = token.punct {
                self.buf.push(p);
                self.col += 1;
            }
            self.line_empty = false;
            self.need_space = true;
        }
    }

    /// Appends message text unchanged as a single fragment.
    ///
    /// The caller has already checked that it fits on the current line.
    pub fn push_verbatim(&mut self, text: &str, text_width: usize) {
        if text.is_empty() {
            return;
        }
        if self.need_space {
            self.buf.push(' ');
            self.col += 1;
        }
        self.buf.push_str(text);
        self.col += text_width;
        self.line_empty = false;
        self.need_space = true;
    }

    /// Appends a rendered key/value pair, preceded by one space unless it
    /// starts a line.
    pub fn push_pair(&mut self, text: &str, text_width: usize) {
        if self.overflows(text_width + usize::from(self.need_space)) {
            self.break_line();
        }
        if self.need_space {
            self.buf.push(' ');
            self.col += 1;
        }
        self.buf.push_str(text);
        self.col += text_width;
        self.line_empty = false;
        self.need_space = true;
    }

    /// Terminates the record and returns the output.
    pub fn finish(mut self) -> String {
        self.buf.push('\n');
        self.buf
    }

    fn overflows(&self, additional: usize) -> bool {
        !self.line_empty && self.col + additional > self.width
    }

    fn break_line(&mut self) {
        self.buf.push('\n');
        self.buf.push_str(self.indent);
        self.col = self.indent_width;
        self.line_empty = true;
        self.need_space = false;
    }

    fn push_word(&mut self, word: &str) {
        let severe = self.highlight.is_some_and(|m| m.is_severe(word));
        if severe {
            self.buf.push_str(SEVERITY_START);
            self.buf.push_str(word);
            self.buf.push_str(SEVERITY_END);
        } else {
            self.buf.push_str(word);
        }
        self.col += display_width(word);
    }
}
