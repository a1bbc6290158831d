use letter_log::{LogConfig, Logger, MemorySink};
use std::thread;

// Installing a `log` backend is once per process, so everything lives in one test
#[test]
fn test_log_facade_routes_to_logger() {
    let sink = MemorySink::new();
    letter_log::init(Logger::new(LogConfig::all_enabled(), sink.clone())).unwrap();
    assert_eq!(log::max_level(), log::LevelFilter::Trace);

    log::trace!("polling");
    log::warn!("disk at {}%", 91);
    thread::spawn(|| log::error!("worker failed")).join().unwrap();

    let lines = sink.lines();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].contains(" TRACE facade_tests.rs("));
    assert!(lines[0].ends_with("): polling"));
    assert!(lines[1].contains(" WARN  facade_tests.rs("));
    assert!(lines[1].ends_with("): disk at 91%"));
    assert!(lines[2].contains(" ERROR facade_tests.rs("));
    assert!(lines[2].ends_with("): worker failed"));

    // A second backend is refused
    assert!(letter_log::init(Logger::silent(MemorySink::new())).is_err());

    // Pool diagnostics pass the trace max level but never reach the sink
    let before = sink.len();
    thread::spawn(|| {
        letter_log::current_thread_letter();
        letter_log::release_current_thread();
    })
    .join()
    .unwrap();
    log::trace!(target: "letter_log::pool", "acquired slot z");
    assert_eq!(sink.len(), before);

    // Records from other targets at the same level still get through
    log::trace!(target: "app::net", "still routed");
    assert_eq!(sink.len(), before + 1);
}
