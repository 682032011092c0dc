//! Leading timestamp detection.
//!
//! Standard-library style loggers prefix each line with a date and/or a time:
//!
//! ```text
//! 2024/01/02 15:04:05 started
//! 2024/01/02 started
//! 15:04:05.123456 started
//! ```
//!
//! The header is split off the message so that wrapped continuation lines can
//! be indented to line up with the text after it.
//!
//! ```rust
//! use kvterm::header::split_header;
//!
//! let (prefix, rest) = split_header("2024/01/02 15:04:05 started");
//! assert_eq!(prefix, "2024/01/02 15:04:05 ");
//! assert_eq!(rest, "started");
//! ```

use once_cell::sync::Lazy;
use regex::Regex;

// ASCII digits only, so the byte length of a match equals its column count.
static HEADER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9]{4}/[0-9]{2}/[0-9]{2} )?([0-9]{2}:[0-9]{2}:[0-9]{2}(\.[0-9]{1,6})? )?")
        .expect("header pattern is valid")
});

/// Splits a leading date/time header from `text`.
///
/// Returns `(prefix, rest)` where `prefix` is the matched header including its
/// trailing space (possibly empty) and `rest` is the remaining message. Input
/// that does not start with a header yields an empty prefix and the text
/// unchanged.
///
/// Consecutive headers are consumed together, so the remainder never starts
/// with another header.
pub fn split_header(text: &str) -> (&str, &str) {
    let mut end = 0;
    while let Some(m) = HEADER_RE.find(&text[end..]) {
        if m.is_empty() {
            break;
        }
        end += m.end();
    }
    text.split_at(end)
}

/// Returns the continuation indent for a record with the given header.
///
/// A non-empty header is replaced by the same number of spaces; otherwise
/// `default_indent` spaces are used.
pub fn continuation_indent(prefix: &str, default_indent: usize) -> String {
    if prefix.is_empty() {
        " ".repeat(default_indent)
    } else {
        " ".repeat(prefix.chars().count())
    }
}
