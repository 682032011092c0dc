//! # kvterm - Readable Terminal Output for Structured Logs
//!
//! `kvterm` renders structured log records (a message plus ordered key/value
//! pairs) as wrapped, indented, optionally coloured lines that fit the
//! terminal. It is meant to sit behind a logging facade as the output sink.
//!
//! ## Core Concepts
//!
//! - [`LogRecord`]: message text and ordered [`KeyValue`] pairs
//! - [`KvWriter`]: renders records and writes each one with a single locked write
//! - [`Renderer`]: the pure layout step, usable without a stream
//! - [`Markers`]: prefixes that hide (`debug:`, `trace:`) or highlight (`error:`) records
//! - [`OutputMode`]: automatic, forced-colour or plain output
//! - [`KvLogger`]: a `log` crate backend
//!
//! ## Quick Start
//!
//! ```rust
//! use kvterm::{KvWriter, LogRecord};
//!
//! let writer = KvWriter::new(Vec::new()).with_width(|| Some(30usize));
//! let record = LogRecord::new("2024/01/02 15:04:05 upload finished")
//!     .with_pair("bytes", "1048576")
//!     .with_pair("file", "report final.pdf");
//!
//! let rendered = writer.render(&record).unwrap();
//! assert_eq!(
//!     rendered,
//!     "2024/01/02 15:04:05 upload\n                    finished\n                    bytes=1048576\n                    file=\"report final.pdf\"\n"
//! );
//! ```
//!
//! ## Layout Rules
//!
//! - A leading `YYYY/MM/DD` and/or `HH:MM:SS[.ffffff]` header stays at the start
//!   of the first line, and continuation lines are indented to its width
//!   (4 spaces when there is no header).
//! - Text breaks between words; a word wider than the line is written whole.
//! - Each key/value pair is placed on the current line if it fits, otherwise on
//!   a new indented line. Pair order is preserved.
//! - Columns are counted in Unicode scalar values. Colour escape sequences are
//!   never counted.
//!
//! ## Logging Facade
//!
//! ```rust,ignore
//! kvterm::KvLogger::builder().verbose(false).init()?;
//! log::error!(path = "/var/data"; "disk full");
//! ```

pub mod config;
mod error;
pub mod header;
pub mod kv;
pub mod logger;
pub mod markers;
pub mod output;
pub mod record;
pub mod render;
pub mod width;
pub mod wrap;
pub mod writer;

// Error type
pub use error::KvError;

pub use config::WriterConfig;
pub use kv::KeyValue;
pub use logger::{KvLogger, KvLoggerBuilder};
pub use markers::{Markers, DEFAULT_LOW_PRIORITY_MARKERS, DEFAULT_SEVERITY_MARKERS};
pub use output::{is_terminal, OutputMode};
pub use record::LogRecord;
pub use render::{RenderedMessage, RenderedPair, Renderer, DEFAULT_INDENT};
pub use width::{display_width, FixedWidth, Stream, TerminalWidth, WidthSource};
pub use writer::KvWriter;
