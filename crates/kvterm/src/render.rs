//! Record assembly.
//!
//! [`Renderer`] turns a [`LogRecord`] into the exact bytes written for it:
//!
//! 1. a leading timestamp header is split off and kept as the start of the
//!    first line; its width becomes the continuation indent;
//! 2. low-priority records are dropped unless verbose;
//! 3. message text is laid out, verbatim when it fits and colour is off,
//!    word by word otherwise;
//! 4. key/value pairs follow, each wrapping independently;
//! 5. one newline ends the record.
//!
//! ```rust
//! use kvterm::{LogRecord, Renderer};
//!
//! let renderer = Renderer::new();
//! let record = LogRecord::new("2024/01/02 15:04:05 started").with_pair("port", "8080");
//! assert_eq!(
//!     renderer.render(&record, 80).as_deref(),
//!     Some("2024/01/02 15:04:05 started port=8080\n")
//! );
//! ```

use crate::header::{continuation_indent, split_header};
use crate::kv::KeyValue;
use crate::markers::Markers;
use crate::record::LogRecord;
use crate::width::display_width;
use crate::wrap::LineLayout;

/// Indent for continuation lines of records without a timestamp header.
pub const DEFAULT_INDENT: usize = 4;

/// A key/value pair in display form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPair {
    pub text: String,
    pub width: usize,
}

/// Measured display form of a record, after the header is removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMessage<'a> {
    /// Message text without the header.
    pub text: &'a str,
    /// Display columns of `text`.
    pub text_width: usize,
    /// Columns needed to show the text and every pair, space separated.
    pub total_width: usize,
    pub pairs: Vec<RenderedPair>,
}

impl<'a> RenderedMessage<'a> {
    pub fn new(text: &'a str, pairs: &[KeyValue]) -> Self {
        let text_width = display_width(text);
        let pairs: Vec<RenderedPair> = pairs
            .iter()
            .map(|kv| {
                let text = kv.to_string();
                let width = display_width(&text);
                RenderedPair { text, width }
            })
            .collect();
        let total_width = text_width + pairs.iter().map(|p| p.width + 1).sum::<usize>();
        Self {
            text,
            text_width,
            total_width,
            pairs,
        }
    }

    /// Whether the whole record fits on one line starting at `column`.
    pub fn fits_on_one_line(&self, column: usize, width: usize) -> bool {
        column + self.total_width <= width
    }
}

/// Renders records to text. Holds no per-record state.
#[derive(Debug, Clone)]
pub struct Renderer {
    markers: Markers,
    verbose: bool,
    color: bool,
    default_indent: usize,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer {
    /// Plain, non-verbose renderer with the default markers.
    pub fn new() -> Self {
        Self {
            markers: Markers::default(),
            verbose: false,
            color: false,
            default_indent: DEFAULT_INDENT,
        }
    }

    pub fn with_markers(mut self, markers: Markers) -> Self {
        self.markers = markers;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn with_default_indent(mut self, indent: usize) -> Self {
        self.default_indent = indent;
        self
    }

    pub fn markers(&self) -> &Markers {
        &self.markers
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    pub fn is_color(&self) -> bool {
        self.color
    }

    pub(crate) fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    pub(crate) fn set_color(&mut self, color: bool) {
        self.color = color;
    }

    /// Returns true if the record would be dropped by the verbosity filter.
    pub fn is_suppressed(&self, record: &LogRecord) -> bool {
        let (_, text) = split_header(&record.text);
        self.suppresses(text)
    }

    fn suppresses(&self, text: &str) -> bool {
        !self.verbose && self.markers.is_low_priority(text)
    }

    /// Renders `record` for a line width of `width` columns.
    ///
    /// Returns `None` when the record is suppressed.
    pub fn render(&self, record: &LogRecord, width: usize) -> Option<String> {
        self.render_with(record, || width)
    }

    /// Like [`render`](Self::render), but asks for the width only once the
    /// record is known to be shown.
    pub fn render_with(
        &self,
        record: &LogRecord,
        width: impl FnOnce() -> usize,
    ) -> Option<String> {
        let (prefix, text) = split_header(&record.text);
        if self.suppresses(text) {
            return None;
        }
        let width = width();

        let indent = continuation_indent(prefix, self.default_indent);
        let message = RenderedMessage::new(text, &record.pairs);
        let highlight = self.color.then_some(&self.markers);
        let mut layout = LineLayout::new(prefix, &indent, width, highlight);

        // Colour output always goes word by word so each word can be matched
        // against the severity markers.
        if self.color || layout.column() + message.text_width > width {
            layout.push_wrapped(message.text);
        } else {
            layout.push_verbatim(message.text, message.text_width);
        }
        for pair in &message.pairs {
            layout.push_pair(&pair.text, pair.width);
        }
        Some(layout.finish())
    }
}
