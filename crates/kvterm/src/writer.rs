//! The output sink.
//!
//! A [`KvWriter`] renders each record into a private buffer and then writes
//! the buffer to its stream with a single `write` call under a mutex. Any
//! number of threads can share one writer: assembly runs concurrently, and
//! only the final write is serialized, so records never interleave.
//!
//! ```rust
//! use kvterm::{KvWriter, LogRecord};
//!
//! let writer = KvWriter::new(Vec::new()).with_width(|| Some(40usize));
//! let n = writer
//!     .write_record(&LogRecord::new("cache warmed").with_pair("entries", "512"))
//!     .unwrap();
//! assert_eq!(n, "cache warmed entries=512\n".len());
//! ```

use std::fmt;
use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};

use crate::config::WriterConfig;
use crate::markers::Markers;
use crate::output::OutputMode;
use crate::record::LogRecord;
use crate::render::Renderer;
use crate::width::{Stream, TerminalWidth, WidthSource, DEFAULT_FALLBACK_WIDTH};

/// Renders records and writes them to a stream.
pub struct KvWriter {
    out: Mutex<Box<dyn Write + Send>>,
    // None: always the fallback width.
    width: Option<Box<dyn WidthSource>>,
    fallback_width: usize,
    renderer: Renderer,
}

impl fmt::Debug for KvWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KvWriter")
            .field("fallback_width", &self.fallback_width)
            .field("renderer", &self.renderer)
            .finish_non_exhaustive()
    }
}

impl KvWriter {
    /// Wraps an arbitrary stream: plain output at the fallback width.
    pub fn new<W: Write + Send + 'static>(out: W) -> Self {
        Self {
            out: Mutex::new(Box::new(out)),
            width: None,
            fallback_width: DEFAULT_FALLBACK_WIDTH,
            renderer: Renderer::new(),
        }
    }

    /// Writer for standard error with detected colour and width.
    pub fn stderr() -> Self {
        Self::for_stream(Stream::Stderr, OutputMode::Auto)
    }

    /// Writer for standard output with detected colour and width.
    pub fn stdout() -> Self {
        Self::for_stream(Stream::Stdout, OutputMode::Auto)
    }

    /// Writer for a standard stream under the given output mode.
    ///
    /// When the stream is a terminal (and the mode is not `Text`) the width
    /// follows the terminal size on every record.
    pub fn for_stream(stream: Stream, mode: OutputMode) -> Self {
        let mut writer = match stream {
            Stream::Stdout => Self::new(io::stdout()),
            Stream::Stderr => Self::new(io::stderr()),
        };
        if mode.should_query_width(stream) {
            writer.width = Some(Box::new(TerminalWidth::new(stream)));
        }
        writer.renderer.set_color(mode.should_use_color(stream));
        writer
    }

    /// Wraps `out` with settings from `config`.
    ///
    /// An arbitrary stream has no terminal to query, so colour is only on
    /// when the config forces `Term`.
    pub fn from_config<W: Write + Send + 'static>(out: W, config: &WriterConfig) -> Self {
        Self::new(out)
            .apply_config(config)
            .color(config.output_mode == OutputMode::Term)
    }

    /// Standard stream writer with settings from `config`.
    pub fn stream_from_config(stream: Stream, config: &WriterConfig) -> Self {
        Self::for_stream(stream, config.output_mode).apply_config(config)
    }

    fn apply_config(self, config: &WriterConfig) -> Self {
        self.verbose(config.verbose)
            .with_markers(config.markers())
            .fallback_width(config.fallback_width)
            .default_indent(config.default_indent)
    }

    /// Shows or hides low-priority records.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.renderer.set_verbose(verbose);
        self
    }

    /// Forces colour output on or off.
    pub fn color(mut self, color: bool) -> Self {
        self.renderer.set_color(color);
        self
    }

    /// Suppresses all escape sequences.
    pub fn no_color(self) -> Self {
        self.color(false)
    }

    /// Replaces the width provider.
    pub fn with_width<S: WidthSource + 'static>(mut self, source: S) -> Self {
        self.width = Some(Box::new(source));
        self
    }

    /// Sets the width used when there is no provider or it has no answer.
    pub fn fallback_width(mut self, width: usize) -> Self {
        self.fallback_width = width.max(1);
        self
    }

    /// Replaces the marker tables.
    pub fn with_markers(mut self, markers: Markers) -> Self {
        self.renderer = self.renderer.with_markers(markers);
        self
    }

    /// Sets the continuation indent for records without a timestamp header.
    pub fn default_indent(mut self, indent: usize) -> Self {
        self.renderer = self.renderer.with_default_indent(indent);
        self
    }

    pub fn is_verbose(&self) -> bool {
        self.renderer.is_verbose()
    }

    pub fn is_color(&self) -> bool {
        self.renderer.is_color()
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    /// Width for the next record: the provider's answer, or the fallback.
    pub fn current_width(&self) -> usize {
        self.width
            .as_ref()
            .and_then(|source| source.columns())
            .filter(|w| *w > 0)
            .unwrap_or(self.fallback_width)
    }

    /// Renders `record` without writing it. `None` if it is suppressed.
    pub fn render(&self, record: &LogRecord) -> Option<String> {
        self.renderer
            .render_with(record, || self.current_width())
    }

    /// Renders and writes one record.
    ///
    /// Returns the number of bytes the stream accepted from its single write
    /// call, or `0` for a suppressed record. Stream errors are returned as
    /// they are; nothing is retried.
    pub fn write_record(&self, record: &LogRecord) -> io::Result<usize> {
        let Some(rendered) = self.render(record) else {
            return Ok(0);
        };
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        out.write(rendered.as_bytes())
    }

    /// Flushes the underlying stream.
    pub fn flush_stream(&self) -> io::Result<()> {
        self.out
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .flush()
    }

    fn write_text(&self, buf: &[u8]) -> io::Result<usize> {
        let text = String::from_utf8_lossy(buf);
        let text = text
            .strip_suffix("\r\n")
            .or_else(|| text.strip_suffix('\n'))
            .unwrap_or(&text);
        self.write_record(&LogRecord::new(text))?;
        Ok(buf.len())
    }
}

/// Each `write` call is one record of plain text without key/value pairs. A
/// single trailing line terminator is dropped, since the writer adds its own.
///
/// `write_fmt` formats the whole message first, so `writeln!` produces one
/// record rather than one per formatted fragment.
impl Write for KvWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_text(buf)
    }

    fn write_fmt(&mut self, args: fmt::Arguments<'_>) -> io::Result<()> {
        self.write_text(args.to_string().as_bytes()).map(drop)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.flush_stream()
    }
}

impl Write for &KvWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_text(buf)
    }

    fn write_fmt(&mut self, args: fmt::Arguments<'_>) -> io::Result<()> {
        self.write_text(args.to_string().as_bytes()).map(drop)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.flush_stream()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::width::FixedWidth;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl SharedBuf {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    struct Short(usize);

    impl Write for Short {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            Ok(buf.len().min(self.0))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn writes_rendered_record() {
        let buf = SharedBuf::default();
        let writer = KvWriter::new(buf.clone()).with_width(FixedWidth(80));
        let n = writer.write_record(&LogRecord::new("hello world")).unwrap();
        assert_eq!(n, 12);
        assert_eq!(buf.contents(), "hello world\n");
    }

    #[test]
    fn suppressed_record_writes_nothing() {
        let buf = SharedBuf::default();
        let writer = KvWriter::new(buf.clone());
        let n = writer.write_record(&LogRecord::new("debug: detail")).unwrap();
        assert_eq!(n, 0);
        assert_eq!(buf.contents(), "");
    }

    #[test]
    fn verbose_shows_low_priority() {
        let buf = SharedBuf::default();
        let writer = KvWriter::new(buf.clone()).verbose(true);
        assert!(writer.is_verbose());
        writer.write_record(&LogRecord::new("debug: detail")).unwrap();
        assert_eq!(buf.contents(), "debug: detail\n");
    }

    #[test]
    fn default_width_is_fallback() {
        let writer = KvWriter::new(io::sink());
        assert_eq!(writer.current_width(), 170);
        assert!(!writer.is_color());
    }

    #[test]
    fn failing_provider_uses_fallback() {
        let writer = KvWriter::new(io::sink())
            .with_width(|| None::<usize>)
            .fallback_width(33);
        assert_eq!(writer.current_width(), 33);
    }

    #[test]
    fn zero_width_uses_fallback() {
        let writer = KvWriter::new(io::sink()).with_width(|| Some(0usize));
        assert_eq!(writer.current_width(), 170);
    }

    #[test]
    fn fallback_width_without_provider() {
        let writer = KvWriter::new(io::sink()).fallback_width(90);
        assert_eq!(writer.current_width(), 90);
    }

    #[test]
    fn provider_wins_over_fallback() {
        let writer = KvWriter::new(io::sink())
            .with_width(FixedWidth(50))
            .fallback_width(90);
        assert_eq!(writer.current_width(), 50);
    }

    #[test]
    fn width_is_queried_per_record() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let width = Arc::new(AtomicUsize::new(80));
        let source = {
            let width = Arc::clone(&width);
            move || Some(width.load(Ordering::SeqCst))
        };
        let buf = SharedBuf::default();
        let writer = KvWriter::new(buf.clone()).with_width(source);
        let record = LogRecord::new("aaaa bbbb");

        writer.write_record(&record).unwrap();
        width.store(6, Ordering::SeqCst);
        writer.write_record(&record).unwrap();

        assert_eq!(buf.contents(), "aaaa bbbb\naaaa\n    bbbb\n");
    }

    #[test]
    fn suppressed_record_skips_width_query() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let queries = Arc::new(AtomicUsize::new(0));
        let source = {
            let queries = Arc::clone(&queries);
            move || {
                queries.fetch_add(1, Ordering::SeqCst);
                Some(80usize)
            }
        };
        let writer = KvWriter::new(io::sink()).with_width(source);
        assert_eq!(writer.write_record(&LogRecord::new("debug: x")).unwrap(), 0);
        assert_eq!(queries.load(Ordering::SeqCst), 0);
        writer.write_record(&LogRecord::new("shown")).unwrap();
        assert_eq!(queries.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn color_highlights_and_no_color_restores() {
        let buf = SharedBuf::default();
        let writer = KvWriter::new(buf.clone()).color(true);
        writer.write_record(&LogRecord::new("error: x")).unwrap();
        let writer = writer.no_color();
        writer.write_record(&LogRecord::new("error: x")).unwrap();
        assert_eq!(buf.contents(), "\x1b[0;31merror:\x1b[0m x\nerror: x\n");
    }

    #[test]
    fn write_error_is_returned() {
        let writer = KvWriter::new(Broken);
        let err = writer.write_record(&LogRecord::new("hi")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }

    #[test]
    fn suppressed_record_skips_broken_stream() {
        let writer = KvWriter::new(Broken);
        assert_eq!(writer.write_record(&LogRecord::new("trace: x")).unwrap(), 0);
    }

    #[test]
    fn short_write_count_is_reported() {
        let writer = KvWriter::new(Short(3));
        assert_eq!(writer.write_record(&LogRecord::new("hello")).unwrap(), 3);
    }

    #[test]
    fn io_write_treats_bytes_as_text() {
        let buf = SharedBuf::default();
        let mut writer = KvWriter::new(buf.clone());
        let n = writer.write(b"plain line\n").unwrap();
        assert_eq!(n, 11);
        writer.write_all(b"second\r\n").unwrap();
        assert_eq!(buf.contents(), "plain line\nsecond\n");
    }

    #[test]
    fn io_write_reports_suppressed_input_consumed() {
        let buf = SharedBuf::default();
        let mut writer = KvWriter::new(buf.clone());
        assert_eq!(writer.write(b"debug: x\n").unwrap(), 9);
        assert_eq!(buf.contents(), "");
    }

    #[test]
    fn shared_reference_is_a_writer() {
        let buf = SharedBuf::default();
        let writer = KvWriter::new(buf.clone());
        let mut shared = &writer;
        writeln!(shared, "value {} of {}", 42, 43).unwrap();
        assert_eq!(buf.contents(), "value 42 of 43\n");
    }

    #[test]
    fn config_applies_settings() {
        let config = WriterConfig {
            verbose: true,
            output_mode: OutputMode::Term,
            fallback_width: 20,
            default_indent: 2,
            low_priority_markers: vec![],
            severity_markers: vec!["fail:".into()],
        };
        let buf = SharedBuf::default();
        let writer = KvWriter::from_config(buf.clone(), &config);
        assert!(writer.is_color());
        assert_eq!(writer.current_width(), 20);
        writer
            .write_record(&LogRecord::new("fail: one two three four"))
            .unwrap();
        assert_eq!(
            buf.contents(),
            "\x1b[0;31mfail:\x1b[0m one two three\n  four\n"
        );
    }

    #[test]
    fn text_mode_stream_is_plain() {
        let writer = KvWriter::for_stream(Stream::Stderr, OutputMode::Text);
        assert!(!writer.is_color());
        assert_eq!(writer.current_width(), 170);
    }
}
