//! `log` facade backend.
//!
//! [`KvLogger`] renders every `log` record through a [`KvWriter`]. The
//! formatted message becomes the record text and the record's structured
//! key/values become pairs:
//!
//! ```rust,ignore
//! use kvterm::KvLogger;
//! use log::Level;
//!
//! KvLogger::builder()
//!     .level(Level::Debug)
//!     .verbose(true)
//!     .init()
//!     .expect("logger already set");
//!
//! log::info!(user = "alice", attempts = 3; "login accepted");
//! // 2024/01/02 15:04:05 login accepted user=alice attempts=3
//! ```
//!
//! Levels other than `info` are written as a lower-case marker in front of
//! the message (`error: `, `warn: `, `debug: `, `trace: `), so debug and
//! trace records follow the writer's verbosity setting and errors are
//! highlighted on colour terminals.

use log::{Level, LevelFilter, Log, Metadata, Record};
use time::macros::format_description;
use time::OffsetDateTime;

use crate::output::OutputMode;
use crate::record::LogRecord;
use crate::width::Stream;
use crate::writer::KvWriter;

/// Logger that writes rendered records to a [`KvWriter`].
#[derive(Debug)]
pub struct KvLogger {
    writer: KvWriter,
    filter: LevelFilter,
    show_timestamps: bool,
    level_prefix: bool,
}

impl KvLogger {
    /// Logger writing to standard error with default settings.
    #[must_use]
    pub fn new(min_level: Level) -> Self {
        KvLoggerBuilder::new().level(min_level).build()
    }

    #[must_use]
    pub fn builder() -> KvLoggerBuilder {
        KvLoggerBuilder::new()
    }

    /// Initialize as the global logger.
    ///
    /// Returns an error if a logger has already been set.
    pub fn init(min_level: Level) -> Result<(), log::SetLoggerError> {
        KvLoggerBuilder::new().level(min_level).init()
    }

    /// Initialize as the global logger, ignoring errors if already set.
    pub fn try_init(min_level: Level) {
        let _ = Self::init(min_level);
    }

    pub fn writer(&self) -> &KvWriter {
        &self.writer
    }

    /// Converts a facade record into the text and pairs that get rendered.
    pub fn to_log_record(&self, record: &Record<'_>) -> LogRecord {
        let mut converted = LogRecord::from_log(record);

        let mut head = String::new();
        if self.show_timestamps {
            let fmt = format_description!("[year]/[month]/[day] [hour]:[minute]:[second]");
            if let Ok(ts) = OffsetDateTime::now_utc().format(fmt) {
                head.push_str(&ts);
                head.push(' ');
            }
        }
        if self.level_prefix {
            if let Some(marker) = level_marker(record.level()) {
                if !converted.text.starts_with(marker) {
                    head.push_str(marker);
                    head.push(' ');
                }
            }
        }
        if !head.is_empty() {
            converted.text.insert_str(0, &head);
        }
        converted
    }
}

/// Marker written in front of messages of the given level.
pub fn level_marker(level: Level) -> Option<&'static str> {
    match level {
        Level::Error => Some("error:"),
        Level::Warn => Some("warn:"),
        Level::Info => None,
        Level::Debug => Some("debug:"),
        Level::Trace => Some("trace:"),
    }
}

impl Log for KvLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        if metadata.level() > self.filter {
            return false;
        }
        // Would be dropped by the verbosity filter after formatting.
        if self.level_prefix && !self.writer.is_verbose() {
            if let Some(marker) = level_marker(metadata.level()) {
                return !self.writer.renderer().markers().is_low_priority(marker);
            }
        }
        true
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        // Log::log has no way to report failure.
        let _ = self.writer.write_record(&self.to_log_record(record));
    }

    fn flush(&self) {
        let _ = self.writer.flush_stream();
    }
}

/// Builder for configuring the logger.
#[derive(Debug)]
pub struct KvLoggerBuilder {
    filter: LevelFilter,
    show_timestamps: bool,
    level_prefix: bool,
    verbose: Option<bool>,
    output_mode: OutputMode,
    writer: Option<KvWriter>,
}

impl Default for KvLoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl KvLoggerBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            filter: LevelFilter::Trace,
            show_timestamps: true,
            level_prefix: true,
            verbose: None,
            output_mode: OutputMode::Auto,
            writer: None,
        }
    }

    /// Set the most detailed level that is logged.
    #[must_use]
    pub fn level(mut self, level: Level) -> Self {
        self.filter = level.to_level_filter();
        self
    }

    /// Set the level from a LevelFilter. `Off` disables all records.
    #[must_use]
    pub fn level_filter(mut self, filter: LevelFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Prefix each message with a UTC `YYYY/MM/DD HH:MM:SS` timestamp.
    #[must_use]
    pub fn with_timestamps(mut self, show: bool) -> Self {
        self.show_timestamps = show;
        self
    }

    /// Prefix each non-info message with its level marker.
    #[must_use]
    pub fn with_level_prefix(mut self, prefix: bool) -> Self {
        self.level_prefix = prefix;
        self
    }

    /// Show low-priority records.
    #[must_use]
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = Some(verbose);
        self
    }

    /// Output mode for the default standard error writer.
    #[must_use]
    pub fn output_mode(mut self, mode: OutputMode) -> Self {
        self.output_mode = mode;
        self
    }

    /// Write to this writer instead of standard error.
    #[must_use]
    pub fn writer(mut self, writer: KvWriter) -> Self {
        self.writer = Some(writer);
        self
    }

    /// Build the logger without installing it.
    #[must_use]
    pub fn build(self) -> KvLogger {
        let mut writer = self
            .writer
            .unwrap_or_else(|| KvWriter::for_stream(Stream::Stderr, self.output_mode));
        if let Some(verbose) = self.verbose {
            writer = writer.verbose(verbose);
        }
        KvLogger {
            writer,
            filter: self.filter,
            show_timestamps: self.show_timestamps,
            level_prefix: self.level_prefix,
        }
    }

    /// Build and install as the global logger.
    ///
    /// Returns an error if a logger has already been set.
    pub fn init(self) -> Result<(), log::SetLoggerError> {
        let logger = self.build();
        let max = logger.filter;
        log::set_boxed_logger(Box::new(logger))?;
        log::set_max_level(max);
        Ok(())
    }

    /// Build and install, ignoring errors if already set.
    pub fn try_init(self) {
        let _ = self.init();
    }
}
