use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

use tracing::Level;

/// Writer handed to the fmt layer for each event.
pub struct DelegatingWriter {
    inner: DelegatingInner,
}

enum DelegatingInner {
    File(Arc<File>),
    Stderr(io::Stderr),
}

impl Write for DelegatingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &mut self.inner {
            DelegatingInner::File(f) => (&**f).write(buf),
            DelegatingInner::Stderr(s) => s.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut self.inner {
            DelegatingInner::File(f) => (&**f).flush(),
            DelegatingInner::Stderr(s) => s.flush(),
        }
    }
}

/// Sends log lines to a file when one is configured, otherwise to stderr.
///
/// A full-screen UI owns stdout, so logging there would corrupt the display.
#[derive(Clone, Debug, Default)]
pub struct SubscriberMakeWriter {
    file: Option<Arc<File>>,
}

impl SubscriberMakeWriter {
    pub fn stderr() -> Self {
        Self { file: None }
    }

    pub fn append_to(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Some(Arc::new(file)),
        })
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for SubscriberMakeWriter {
    type Writer = DelegatingWriter;

    fn make_writer(&'a self) -> Self::Writer {
        let inner = match &self.file {
            Some(file) => DelegatingInner::File(file.clone()),
            None => DelegatingInner::Stderr(io::stderr()),
        };
        DelegatingWriter { inner }
    }
}

fn init_with_writer(writer: SubscriberMakeWriter, level: Level) {
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false)
        .with_thread_names(false)
        .try_init();
}

/// Initialize a stderr subscriber. Safe to call multiple times; subsequent
/// calls are no-ops for the global subscriber.
pub fn init_stderr(level: Level) {
    init_with_writer(SubscriberMakeWriter::stderr(), level);
}

/// Initialize a subscriber appending to `path`.
pub fn init_with_file(path: &Path, level: Level) -> io::Result<()> {
    init_with_writer(SubscriberMakeWriter::append_to(path)?, level);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::fmt::MakeWriter;

    #[test]
    fn file_writer_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("layout.log");
        let make = SubscriberMakeWriter::append_to(&path).unwrap();
        make.make_writer().write_all(b"first\n").unwrap();
        let mut w = make.make_writer();
        w.write_all(b"second\n").unwrap();
        w.flush().unwrap();

        let again = SubscriberMakeWriter::append_to(&path).unwrap();
        again.make_writer().write_all(b"third\n").unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "first\nsecond\nthird\n");
    }

    #[test]
    fn scoped_subscriber_writes_events_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.log");
        let subscriber = tracing_subscriber::fmt()
            .with_writer(SubscriberMakeWriter::append_to(&path).unwrap())
            .with_ansi(false)
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(window = 3, "container added");
        });
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("container added"));
        assert!(contents.contains("window=3"));
    }
}
