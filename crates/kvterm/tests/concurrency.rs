//! Many threads sharing one writer.

mod common;

use std::io::{self, Write};
use std::sync::Arc;
use std::thread;

use common::SharedBuf;
use kvterm::{FixedWidth, KvWriter, LogRecord};

#[test]
fn concurrent_records_never_interleave() {
    const THREADS: usize = 8;
    const PER_THREAD: usize = 200;

    let buf = SharedBuf::default();
    let writer = Arc::new(KvWriter::new(buf.clone()).with_width(FixedWidth(24)));

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let writer = Arc::clone(&writer);
            thread::spawn(move || {
                for i in 0..PER_THREAD {
                    let record = LogRecord::new(format!("thread {t} writes record number {i}"))
                        .with_pair("thread", t.to_string())
                        .with_pair("seq", i.to_string());
                    writer.write_record(&record).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    // Every record starts on an unindented line; continuation lines are
    // indented. A record split by another thread's write would leave a
    // continuation line after the wrong head.
    let out = buf.contents();
    let mut records: Vec<Vec<&str>> = Vec::new();
    for line in out.lines() {
        if line.starts_with(' ') {
            records.last_mut().expect("continuation without head").push(line);
        } else {
            records.push(vec![line]);
        }
    }
    assert_eq!(records.len(), THREADS * PER_THREAD);

    for record in &records {
        let joined = record
            .iter()
            .map(|l| l.trim())
            .collect::<Vec<_>>()
            .join(" ");
        let words: Vec<&str> = joined.split(' ').collect();
        let t = words[1];
        let i = words[5];
        assert_eq!(
            joined,
            format!("thread {t} writes record number {i} thread={t} seq={i}")
        );
    }

    // Per-thread order is preserved.
    for t in 0..THREADS {
        let head = format!("thread {t} ");
        let seqs: Vec<usize> = records
            .iter()
            .filter(|r| r[0].starts_with(&head))
            .map(|r| {
                let joined = r.join(" ");
                joined.split_whitespace().nth(5).unwrap().parse().unwrap()
            })
            .collect();
        assert_eq!(seqs, (0..PER_THREAD).collect::<Vec<_>>());
    }
}

#[test]
fn writer_is_usable_after_a_panicking_stream() {
    struct PanicOnce {
        panicked: bool,
        inner: SharedBuf,
    }

    impl Write for PanicOnce {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if !self.panicked {
                self.panicked = true;
                panic!("stream failure");
            }
            self.inner.write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    let buf = SharedBuf::default();
    let writer = Arc::new(KvWriter::new(PanicOnce {
        panicked: false,
        inner: buf.clone(),
    }));

    let first = {
        let writer = Arc::clone(&writer);
        thread::spawn(move || writer.write_record(&LogRecord::new("lost")))
    };
    assert!(first.join().is_err());

    writer.write_record(&LogRecord::new("kept")).unwrap();
    assert_eq!(buf.contents(), "kept\n");
}
