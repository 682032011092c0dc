//! Serializable writer configuration.
//!
//! ```rust
//! use kvterm::{OutputMode, WriterConfig};
//!
//! let config = WriterConfig::from_yaml(r#"
//! verbose: true
//! output_mode: text
//! severity_markers: ["error:", "fatal:"]
//! "#).unwrap();
//!
//! assert!(config.verbose);
//! assert_eq!(config.output_mode, OutputMode::Text);
//! assert_eq!(config.fallback_width, 170);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::KvError;
use crate::markers::{Markers, DEFAULT_LOW_PRIORITY_MARKERS, DEFAULT_SEVERITY_MARKERS};
use crate::output::OutputMode;
use crate::render::DEFAULT_INDENT;
use crate::width::DEFAULT_FALLBACK_WIDTH;

/// Settings for a [`KvWriter`](crate::KvWriter). Missing fields take their
/// defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriterConfig {
    /// Show records that start with a low-priority marker.
    pub verbose: bool,
    pub output_mode: OutputMode,
    /// Width used when no terminal width is known.
    pub fallback_width: usize,
    /// Continuation indent for records without a timestamp header.
    pub default_indent: usize,
    pub low_priority_markers: Vec<String>,
    pub severity_markers: Vec<String>,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            output_mode: OutputMode::Auto,
            fallback_width: DEFAULT_FALLBACK_WIDTH,
            default_indent: DEFAULT_INDENT,
            low_priority_markers: to_strings(DEFAULT_LOW_PRIORITY_MARKERS),
            severity_markers: to_strings(DEFAULT_SEVERITY_MARKERS),
        }
    }
}

impl WriterConfig {
    /// Parses configuration from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self, KvError> {
        let config: WriterConfig = serde_yaml::from_str(yaml)?;
        if config.fallback_width == 0 {
            return Err(KvError::Config("fallback_width must be at least 1".into()));
        }
        Ok(config)
    }

    /// Marker tables described by this configuration.
    pub fn markers(&self) -> Markers {
        Markers::new(
            self.low_priority_markers.iter().cloned(),
            self.severity_markers.iter().cloned(),
        )
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
