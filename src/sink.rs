use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;
use parking_lot::Mutex;

/// Destination for rendered log lines.
///
/// Implementations decide where a line ends up: a console stream, a file, an
/// in-memory buffer. The logger hands over one complete line per enabled call
/// (without the trailing newline) and ignores any error returned, so a
/// failing sink never disturbs the code that is logging.
///
/// Sinks are shared between threads, so they must be `Send + Sync`. Sinks
/// that wrap a single writer serialize writes internally, which keeps lines
/// from different threads from interleaving.
///
/// # Usage
///
/// ```
/// # use letter_log::LogSink;
/// # use std::io;
/// struct Prefixed;
///
/// impl LogSink for Prefixed {
///     fn write_line(&self, line: &str) -> io::Result<()> {
///         println!("[app] {}", line);
///         Ok(())
///     }
/// }
/// ```
pub trait LogSink: Send + Sync {
    /// Writes one line. The sink appends the line terminator itself.
    fn write_line(&self, line: &str) -> io::Result<()>;

    /// Pushes out anything buffered.
    fn flush(&self) -> io::Result<()> {
        Ok(())
    }
}

impl<S: LogSink + ?Sized> LogSink for Box<S> {
    fn write_line(&self, line: &str) -> io::Result<()> {
        (**self).write_line(line)
    }

    fn flush(&self) -> io::Result<()> {
        (**self).flush()
    }
}

impl<S: LogSink + ?Sized> LogSink for Arc<S> {
    fn write_line(&self, line: &str) -> io::Result<()> {
        (**self).write_line(line)
    }

    fn flush(&self) -> io::Result<()> {
        (**self).flush()
    }
}

/// Writes lines to standard output.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl LogSink for StdoutSink {
    fn write_line(&self, line: &str) -> io::Result<()> {
        let mut out = io::stdout().lock();
        writeln!(out, "{}", line)
    }

    fn flush(&self) -> io::Result<()> {
        io::stdout().flush()
    }
}

/// Writes lines to standard error.
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrSink;

impl LogSink for StderrSink {
    fn write_line(&self, line: &str) -> io::Result<()> {
        let mut err = io::stderr().lock();
        writeln!(err, "{}", line)
    }
}

/// Discards every line.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl LogSink for NullSink {
    fn write_line(&self, _line: &str) -> io::Result<()> {
        Ok(())
    }
}

/// Writes lines to any `Write` implementation behind a mutex.
pub struct WriterSink<W: Write + Send> {
    writer: Mutex<W>,
}

impl<W: Write + Send> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Consumes the sink and returns the writer.
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

impl WriterSink<File> {
    /// Opens `path` for appending, creating it if needed.
    pub fn create<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self::new(file))
    }
}

impl<W: Write + Send> LogSink for WriterSink<W> {
    fn write_line(&self, line: &str) -> io::Result<()> {
        let mut writer = self.writer.lock();
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")
    }

    fn flush(&self) -> io::Result<()> {
        self.writer.lock().flush()
    }
}

/// Collects lines in memory.
///
/// Clones share the same buffer, so one clone can be handed to a logger and
/// another kept to inspect what was written.
///
/// ```
/// # use letter_log::{LogSink, MemorySink};
/// let sink = MemorySink::new();
/// let shared = sink.clone();
/// sink.write_line("hello").unwrap();
/// assert_eq!(shared.lines(), vec!["hello".to_string()]);
/// ```
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A snapshot of every line written so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lines.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.lock().is_empty()
    }

    /// Removes and returns every line written so far.
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.lines.lock())
    }
}

impl LogSink for MemorySink {
    fn write_line(&self, line: &str) -> io::Result<()> {
        self.lines.lock().push(line.to_string());
        Ok(())
    }
}
