use letter_log::{
    call_site, log_debug, log_error, log_function_start, log_info, log_verbose, log_warning,
    CallSite, Level, LogConfig, LogSink, Logger, MemorySink, WriterSink,
};
use std::collections::HashSet;
use std::fs;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

struct FailingSink {
    attempts: Arc<AtomicUsize>,
}

impl LogSink for FailingSink {
    fn write_line(&self, _line: &str) -> io::Result<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "sink closed"))
    }
}

/// Splits a line into timestamp, letter, level tag and the rest.
fn fields(line: &str) -> (&str, &str, &str, &str) {
    let (timestamp, rest) = line.split_at(12);
    let rest = &rest[1..];
    let (letter, rest) = rest.split_at(1);
    let rest = &rest[1..];
    let (tag, rest) = rest.split_at(5);
    (timestamp, letter, tag, &rest[1..])
}

fn assert_timestamp(timestamp: &str) {
    let bytes = timestamp.as_bytes();
    assert_eq!(bytes.len(), 12, "timestamp {:?}", timestamp);
    assert_eq!(bytes[2], b':');
    assert_eq!(bytes[5], b':');
    assert_eq!(bytes[8], b'.');
    for (i, b) in bytes.iter().enumerate() {
        if ![2, 5, 8].contains(&i) {
            assert!(b.is_ascii_digit(), "timestamp {:?}", timestamp);
        }
    }
}

#[test]
fn test_warnings_and_errors_preset() {
    let sink = MemorySink::new();
    let logger = Logger::warnings_and_errors_only(sink.clone());

    logger.debug("x", CallSite::new("src/app.rs", 10));
    assert!(sink.is_empty(), "debug should be gated off");

    logger.warning("y", CallSite::new("src/app.rs", 11));
    let lines = sink.lines();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].ends_with(" WARN  app.rs(11): y"));

    let (timestamp, letter, tag, rest) = fields(&lines[0]);
    assert_timestamp(timestamp);
    assert_eq!(letter.chars().count(), 1);
    assert_eq!(tag, "WARN ");
    assert_eq!(rest, "app.rs(11): y");
}

#[test]
fn test_all_enabled_is_default() {
    let sink = MemorySink::new();
    let logger = Logger::new(LogConfig::default(), sink.clone());
    for level in Level::ALL {
        logger.log(level, &level.name(), call_site!());
    }
    assert_eq!(sink.len(), Level::ALL.len());
}

#[test]
fn test_macros_format_and_tag() {
    let sink = MemorySink::new();
    let logger = Logger::all_enabled(sink.clone());

    log_verbose!(logger, "v{}", 1);
    log_debug!(logger, "d{}", 2);
    log_info!(logger, "i{}", 3);
    log_warning!(logger, "w{}", 4);
    log_error!(logger, "e{}", 5);

    let lines = sink.lines();
    let expected = [
        ("TRACE", "v1"),
        ("DEBUG", "d2"),
        ("INFO ", "i3"),
        ("WARN ", "w4"),
        ("ERROR", "e5"),
    ];
    for (line, (tag, message)) in lines.iter().zip(expected.iter()) {
        let (_, _, got_tag, rest) = fields(line);
        assert_eq!(got_tag, *tag);
        assert!(rest.starts_with("logger_tests.rs("), "rest was {:?}", rest);
        assert!(rest.ends_with(&format!("): {}", message)));
    }
}

struct Connection {
    peer: u32,
}

impl std::fmt::Display for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "peer {}", self.peer)
    }
}

fn handshake(logger: &Logger, connection: &Connection) {
    log_function_start!(logger, debug);
    log_function_start!(logger, info, connection);
}

#[test]
fn test_function_start_messages() {
    let sink = MemorySink::new();
    let logger = Logger::all_enabled(sink.clone());
    handshake(&logger, &Connection { peer: 9 });

    let lines = sink.lines();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains(" DEBUG "));
    assert!(lines[0].ends_with(": Start handshake"));
    assert!(lines[1].contains(" INFO  "));
    assert!(lines[1].ends_with(": Start handshake (peer 9)"));
}

#[test]
fn test_function_start_gated() {
    let sink = MemorySink::new();
    let logger = Logger::warnings_and_errors_only(sink.clone());
    handshake(&logger, &Connection { peer: 1 });
    assert!(sink.is_empty());
}

#[test]
fn test_failing_sink_is_ignored() {
    let attempts = Arc::new(AtomicUsize::new(0));
    let logger = Logger::all_enabled(FailingSink {
        attempts: Arc::clone(&attempts),
    });

    logger.error("lost", call_site!());
    logger.info("lost too", call_site!());
    assert_eq!(attempts.load(Ordering::SeqCst), 2);
}

#[test]
fn test_per_thread_letters_in_output() {
    let sink = MemorySink::new();
    let logger = Arc::new(Logger::all_enabled(sink.clone()));

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let logger = Arc::clone(&logger);
            thread::spawn(move || {
                for n in 0..10 {
                    log_info!(logger, "worker {} line {}", i, n);
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    let lines = sink.lines();
    assert_eq!(lines.len(), 40);

    // Each worker logs under a single letter, and lines keep per-thread order
    for i in 0..4 {
        let prefix = format!("worker {} line ", i);
        let mine: Vec<_> = lines.iter().filter(|l| l.contains(&prefix)).collect();
        assert_eq!(mine.len(), 10);

        let letters: HashSet<_> = mine.iter().map(|l| fields(l).1).collect();
        assert_eq!(letters.len(), 1);

        for (n, line) in mine.iter().enumerate() {
            assert!(line.ends_with(&format!("{}{}", prefix, n)));
        }
    }
}

#[test]
fn test_writer_sink_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.log");

    {
        let logger = Logger::all_enabled(WriterSink::create(&path).unwrap());
        logger.info("first", call_site!());
        logger.error("second", call_site!());
        logger.flush();
    }

    let contents = fs::read_to_string(&path).unwrap();
    let lines: Vec<_> = contents.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].ends_with("): first"));
    assert!(lines[1].contains(" ERROR logger_tests.rs("));
}

#[test]
fn test_config_from_string() {
    let sink = MemorySink::new();
    let mut logger = Logger::silent(sink.clone());
    logger.set_config("debug,error".parse().unwrap());

    logger.debug("a", call_site!());
    logger.info("b", call_site!());
    logger.error("c", call_site!());
    assert_eq!(sink.len(), 2);
}
