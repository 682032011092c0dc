//! Key/value pairs and their display form.
//!
//! Pairs render as `key=value`. A key or value that would be ambiguous on a
//! log line (empty, or containing whitespace, `=`, `"` or control characters)
//! is quoted with Rust string escaping:
//!
//! ```rust
//! use kvterm::KeyValue;
//!
//! assert_eq!(KeyValue::new("id", "42").to_string(), "id=42");
//! assert_eq!(KeyValue::new("path", "/a b").to_string(), r#"path="/a b""#);
//! assert_eq!(KeyValue::new("note", "").to_string(), r#"note="""#);
//! ```

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// One key/value pair of a record, holding the value's text form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValue {
    pub key: String,
    pub value: String,
}

impl KeyValue {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for KeyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", quote(&self.key), quote(&self.value))
    }
}

impl<K: Into<String>, V: Into<String>> From<(K, V)> for KeyValue {
    fn from((key, value): (K, V)) -> Self {
        Self::new(key, value)
    }
}

/// Returns `s` unchanged, or quoted if it would not read back as one token.
pub fn quote(s: &str) -> Cow<'_, str> {
    if needs_quotes(s) {
        Cow::Owned(format!("{:?}", s))
    } else {
        Cow::Borrowed(s)
    }
}

fn needs_quotes(s: &str) -> bool {
    s.is_empty()
        || s
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || c == '=' || c == '"')
}

/// Collects pairs from a `log` record's key/value source, in order.
pub(crate) struct PairCollector {
    pub(crate) pairs: Vec<KeyValue>,
}

impl<'kvs> log::kv::VisitSource<'kvs> for PairCollector {
    fn visit_pair(
        &mut self,
        key: log::kv::Key<'kvs>,
        value: log::kv::Value<'kvs>,
    ) -> Result<(), log::kv::Error> {
        self.pairs.push(KeyValue::new(key.as_str(), value.to_string()));
        Ok(())
    }
}
