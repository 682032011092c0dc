//! The structured record handed to the renderer.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::KvError;
use crate::kv::{KeyValue, PairCollector};

/// A log entry: free text plus ordered key/value pairs.
///
/// Keys need not be unique. Pair order is preserved through rendering.
///
/// ```rust
/// use kvterm::LogRecord;
///
/// let record = LogRecord::new("request done")
///     .with_pair("status", "200")
///     .with_pair("path", "/index.html");
/// assert_eq!(record.pairs.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    pub text: String,
    pub pairs: Vec<KeyValue>,
}

impl LogRecord {
    /// Creates a record with no key/value pairs.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            pairs: Vec::new(),
        }
    }

    /// Appends a key/value pair.
    pub fn with_pair(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.pairs.push(KeyValue::new(key, value));
        self
    }

    /// Builds a record from a flat `[key, value, key, value, ...]` list.
    ///
    /// Every even position must hold a string key. String values are used as
    /// they are; any other value uses its JSON text. A list of odd length or a
    /// non-string key rejects the whole record.
    ///
    /// ```rust
    /// use kvterm::LogRecord;
    /// use serde_json::json;
    ///
    /// let record = LogRecord::from_list("saved", &[json!("id"), json!(7)]).unwrap();
    /// assert_eq!(record.pairs[0].value, "7");
    ///
    /// assert!(LogRecord::from_list("saved", &[json!("id")]).is_err());
    /// ```
    pub fn from_list(text: impl Into<String>, list: &[Value]) -> Result<Self, KvError> {
        if list.len() % 2 != 0 {
            return Err(KvError::OddKeyValues { len: list.len() });
        }
        let mut pairs = Vec::with_capacity(list.len() / 2);
        for (i, chunk) in list.chunks_exact(2).enumerate() {
            let key = match &chunk[0] {
                Value::String(s) => s.clone(),
                other => {
                    return Err(KvError::NonStringKey {
                        index: i * 2,
                        found: other.to_string(),
                    })
                }
            };
            let value = match &chunk[1] {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            pairs.push(KeyValue { key, value });
        }
        Ok(Self {
            text: text.into(),
            pairs,
        })
    }

    /// Builds a record from a `log` facade record, taking the formatted
    /// message as text and the record's key/values in order.
    pub fn from_log(record: &log::Record<'_>) -> Self {
        let mut collector = PairCollector { pairs: Vec::new() };
        // The collector never fails.
        let _ = record.key_values().visit(&mut collector);
        Self {
            text: record.args().to_string(),
            pairs: collector.pairs,
        }
    }
}
