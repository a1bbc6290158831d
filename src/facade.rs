use log::{Log, Metadata, Record, SetLoggerError};
use crate::level::Level;
use crate::logger::Logger;
use crate::record::CallSite;

/// Bridge between the `log` crate facade and [`Logger`].
///
/// Once installed with [`init`], every `log::info!`, `log::warn!` and friends
/// in the process is rendered by the letter logger. File and line come from
/// the `log` record; records without them show `<unknown>(0)`.
///
/// Records emitted by this crate itself (target `letter_log...`) are
/// dropped. They are produced while a thread's letter is being assigned, and
/// routing them back through the logger would ask for that letter again.

const OWN_TARGET: &str = "letter_log";

fn is_own_target(target: &str) -> bool {
    target == OWN_TARGET || target.starts_with("letter_log::")
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        !is_own_target(metadata.target()) && self.is_enabled(Level::from(metadata.level()))
    }

    fn log(&self, record: &Record<'_>) {
        if !Log::enabled(self, record.metadata()) {
            return;
        }

        let call_site = CallSite::new(
            record.file().unwrap_or("<unknown>"),
            record.line().unwrap_or(0),
        );
        Logger::log(self, Level::from(record.level()), record.args(), call_site);
    }

    fn flush(&self) {
        Logger::flush(self);
    }
}

/// Installs `logger` as the process-wide `log` backend.
///
/// The `log` max level is set from the logger's config so disabled levels are
/// filtered before a record is built. Fails if a backend is already set.
pub fn init(logger: Logger) -> Result<(), SetLoggerError> {
    let max_level = logger.config().max_level_filter();
    log::set_boxed_logger(Box::new(logger))?;
    log::set_max_level(max_level);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LogConfig;
    use crate::sink::MemorySink;

    #[test]
    fn test_own_target_detection() {
        assert!(is_own_target("letter_log"));
        assert!(is_own_target("letter_log::pool"));
        assert!(!is_own_target("letter_logger"));
        assert!(!is_own_target("app::net"));
    }

    #[test]
    fn test_log_record_is_rendered() {
        let sink = MemorySink::new();
        let logger = Logger::new(LogConfig::all_enabled(), sink.clone());

        Log::log(
            &logger,
            &Record::builder()
                .args(format_args!("bound to {}", 8080))
                .level(log::Level::Warn)
                .target("app::net")
                .file(Some("src/net/listener.rs"))
                .line(Some(17))
                .build(),
        );

        let lines = sink.lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].ends_with(" WARN  listener.rs(17): bound to 8080"));
    }

    #[test]
    fn test_own_records_are_dropped() {
        let sink = MemorySink::new();
        let logger = Logger::new(LogConfig::all_enabled(), sink.clone());

        Log::log(
            &logger,
            &Record::builder()
                .args(format_args!("acquired slot a"))
                .level(log::Level::Trace)
                .target("letter_log::pool")
                .build(),
        );
        assert!(sink.is_empty());
    }

    #[test]
    fn test_gated_level_is_not_enabled() {
        let logger = Logger::warnings_and_errors_only(MemorySink::new());
        let info = Metadata::builder().level(log::Level::Info).target("app").build();
        let error = Metadata::builder().level(log::Level::Error).target("app").build();
        assert!(!Log::enabled(&logger, &info));
        assert!(Log::enabled(&logger, &error));
    }
}
