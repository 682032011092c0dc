//! Message prefix tables.
//!
//! Two tables drive per-record decisions:
//!
//! - low-priority markers (`debug:`, `trace:`) suppress a record unless the
//!   writer is verbose. Matching is case-sensitive and anchored at the start
//!   of the message text, after any timestamp header.
//! - severity markers (`error:`) highlight any word that starts with them
//!   when colour output is on. Matching is case-insensitive.
//!
//! Both tables are plain values handed to the writer at construction, so
//! callers can extend or replace them.
//!
//! ```rust
//! use kvterm::Markers;
//!
//! let markers = Markers::default().with_severity("fatal:");
//! assert!(markers.is_low_priority("debug: cache miss"));
//! assert!(markers.is_severe("FATAL:"));
//! ```

use serde::{Deserialize, Serialize};

/// Markers that hide a record unless verbose output is enabled.
pub const DEFAULT_LOW_PRIORITY_MARKERS: &[&str] = &["debug:", "trace:"];

/// Markers that colour a word red.
pub const DEFAULT_SEVERITY_MARKERS: &[&str] = &["error:"];

/// Low-priority and severity prefix tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Markers {
    low_priority: Vec<String>,
    severity: Vec<String>,
}

impl Default for Markers {
    fn default() -> Self {
        Self::new(
            DEFAULT_LOW_PRIORITY_MARKERS.iter().copied(),
            DEFAULT_SEVERITY_MARKERS.iter().copied(),
        )
    }
}

impl Markers {
    /// Creates marker tables from explicit lists.
    pub fn new<L, S>(low_priority: L, severity: S) -> Self
    where
        L: IntoIterator,
        L::Item: Into<String>,
        S: IntoIterator,
        S::Item: Into<String>,
    {
        Self {
            low_priority: low_priority.into_iter().map(Into::into).collect(),
            severity: severity.into_iter().map(Into::into).collect(),
        }
    }

    /// Creates empty tables: nothing is suppressed and nothing is highlighted.
    pub fn none() -> Self {
        Self {
            low_priority: Vec::new(),
            severity: Vec::new(),
        }
    }

    /// Adds a low-priority marker.
    pub fn with_low_priority(mut self, marker: impl Into<String>) -> Self {
        self.low_priority.push(marker.into());
        self
    }

    /// Adds a severity marker.
    pub fn with_severity(mut self, marker: impl Into<String>) -> Self {
        self.severity.push(marker.into());
        self
    }

    /// The configured low-priority markers.
    pub fn low_priority(&self) -> &[String] {
        &self.low_priority
    }

    /// The configured severity markers.
    pub fn severity(&self) -> &[String] {
        &self.severity
    }

    /// Returns true if `text` starts with a low-priority marker.
    pub fn is_low_priority(&self, text: &str) -> bool {
        self.low_priority.iter().any(|m| text.starts_with(m.as_str()))
    }

    /// Returns true if `word` starts with a severity marker, ignoring case.
    pub fn is_severe(&self, word: &str) -> bool {
        self.severity.iter().any(|m| starts_with_folded(word, m))
    }
}

/// Prefix test on the lower-cased characters of both strings.
fn starts_with_folded(text: &str, prefix: &str) -> bool {
    let mut chars = text.chars().flat_map(char::to_lowercase);
    prefix
        .chars()
        .flat_map(char::to_lowercase)
        .all(|p| chars.next() == Some(p))
}
