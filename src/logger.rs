use std::fmt;
use crate::config::LogConfig;
use crate::level::Level;
use crate::record::{function_start_message, CallSite, LogRecord};
use crate::sink::{LogSink, StdoutSink};
use crate::thread_registry::current_thread_letter;

/// A line-oriented logger that tags every record with the thread's letter.
///
/// Each enabled call renders exactly one line and hands it to the sink
/// synchronously. There is no buffering, batching or retry, and a failing
/// sink is ignored. Lines logged from one thread keep their call order;
/// lines from different threads are ordered only by their timestamps.
///
/// # Thread Safety
///
/// `Logger` is `Send + Sync` and can be shared through an `Arc` or installed
/// as the `log` facade backend with [`init`](crate::init). Its config belongs
/// to the instance; changing it needs `&mut self`.
///
/// # Examples
///
/// ```
/// # use letter_log::{call_site, Logger, LogConfig, MemorySink};
/// let sink = MemorySink::new();
/// let logger = Logger::new(LogConfig::warnings_and_errors_only(), sink.clone());
///
/// logger.debug("cache miss", call_site!());
/// logger.warning("retrying", call_site!());
///
/// let lines = sink.lines();
/// assert_eq!(lines.len(), 1);
/// assert!(lines[0].contains(" WARN  "));
/// assert!(lines[0].ends_with("): retrying"));
/// ```
pub struct Logger {
    config: LogConfig,
    sink: Box<dyn LogSink>,
}

impl Logger {
    pub fn new(config: LogConfig, sink: impl LogSink + 'static) -> Self {
        Self {
            config,
            sink: Box::new(sink),
        }
    }

    /// Everything enabled, writing to stdout.
    pub fn stdout() -> Self {
        Self::new(LogConfig::all_enabled(), StdoutSink)
    }

    pub fn all_enabled(sink: impl LogSink + 'static) -> Self {
        Self::new(LogConfig::all_enabled(), sink)
    }

    pub fn warnings_and_errors_only(sink: impl LogSink + 'static) -> Self {
        Self::new(LogConfig::warnings_and_errors_only(), sink)
    }

    pub fn silent(sink: impl LogSink + 'static) -> Self {
        Self::new(LogConfig::silent(), sink)
    }

    pub fn config(&self) -> &LogConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut LogConfig {
        &mut self.config
    }

    pub fn set_config(&mut self, config: LogConfig) {
        self.config = config;
    }

    #[inline]
    pub fn is_enabled(&self, level: Level) -> bool {
        self.config.is_enabled(level)
    }

    /// Writes one record if `level` is enabled.
    pub fn log(&self, level: Level, message: &dyn fmt::Display, call_site: CallSite<'_>) {
        if !self.config.is_enabled(level) {
            return;
        }

        let record = LogRecord::now(current_thread_letter(), level, call_site, message);
        let _ = self.sink.write_line(&record.to_string());
    }

    pub fn verbose(&self, message: impl fmt::Display, call_site: CallSite<'_>) {
        self.log(Level::Verbose, &message, call_site);
    }

    pub fn debug(&self, message: impl fmt::Display, call_site: CallSite<'_>) {
        self.log(Level::Debug, &message, call_site);
    }

    pub fn info(&self, message: impl fmt::Display, call_site: CallSite<'_>) {
        self.log(Level::Info, &message, call_site);
    }

    pub fn warning(&self, message: impl fmt::Display, call_site: CallSite<'_>) {
        self.log(Level::Warning, &message, call_site);
    }

    pub fn error(&self, message: impl fmt::Display, call_site: CallSite<'_>) {
        self.log(Level::Error, &message, call_site);
    }

    /// Logs `Start <function>` at debug level, with `myself` in parentheses
    /// when given.
    pub fn debug_function_start(
        &self,
        function: &str,
        myself: Option<&dyn fmt::Display>,
        call_site: CallSite<'_>,
    ) {
        self.function_start(Level::Debug, function, myself, call_site);
    }

    /// Info-level counterpart of [`Logger::debug_function_start`].
    pub fn info_function_start(
        &self,
        function: &str,
        myself: Option<&dyn fmt::Display>,
        call_site: CallSite<'_>,
    ) {
        self.function_start(Level::Info, function, myself, call_site);
    }

    fn function_start(
        &self,
        level: Level,
        function: &str,
        myself: Option<&dyn fmt::Display>,
        call_site: CallSite<'_>,
    ) {
        // Skip building the message when gated off
        if self.config.is_enabled(level) {
            self.log(level, &function_start_message(function, myself), call_site);
        }
    }

    pub fn flush(&self) {
        let _ = self.sink.flush();
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::stdout()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger").field("config", &self.config).finish()
    }
}

/// Logs a `format!`-style message at verbose level.
///
/// ```
/// # use letter_log::{log_verbose, Logger, MemorySink};
/// # let logger = Logger::all_enabled(MemorySink::new());
/// log_verbose!(logger, "polling {} sockets", 3);
/// ```
#[macro_export]
macro_rules! log_verbose {
    ($logger:expr, $($arg:tt)+) => {
        $logger.log($crate::Level::Verbose, &format_args!($($arg)+), $crate::call_site!())
    };
}

/// Logs a `format!`-style message at debug level.
#[macro_export]
macro_rules! log_debug {
    ($logger:expr, $($arg:tt)+) => {
        $logger.log($crate::Level::Debug, &format_args!($($arg)+), $crate::call_site!())
    };
}

/// Logs a `format!`-style message at info level.
#[macro_export]
macro_rules! log_info {
    ($logger:expr, $($arg:tt)+) => {
        $logger.log($crate::Level::Info, &format_args!($($arg)+), $crate::call_site!())
    };
}

/// Logs a `format!`-style message at warning level.
#[macro_export]
macro_rules! log_warning {
    ($logger:expr, $($arg:tt)+) => {
        $logger.log($crate::Level::Warning, &format_args!($($arg)+), $crate::call_site!())
    };
}

/// Logs a `format!`-style message at error level.
#[macro_export]
macro_rules! log_error {
    ($logger:expr, $($arg:tt)+) => {
        $logger.log($crate::Level::Error, &format_args!($($arg)+), $crate::call_site!())
    };
}

/// Logs the start of the enclosing function.
///
/// The level is `debug` or `info`; an optional second expression describes
/// the receiver and must implement `Display`.
///
/// ```
/// # use letter_log::{log_function_start, Logger, MemorySink};
/// let sink = MemorySink::new();
/// let logger = Logger::all_enabled(sink.clone());
///
/// fn reconnect(logger: &Logger) {
///     log_function_start!(logger, debug);
///     log_function_start!(logger, info, "peer 7");
/// }
/// reconnect(&logger);
///
/// let lines = sink.lines();
/// assert!(lines[0].ends_with("Start reconnect"));
/// assert!(lines[1].ends_with("Start reconnect (peer 7)"));
/// ```
#[macro_export]
macro_rules! log_function_start {
    ($logger:expr, debug) => {
        $logger.debug_function_start($crate::function_name!(), None, $crate::call_site!())
    };
    ($logger:expr, debug, $myself:expr) => {
        $logger.debug_function_start($crate::function_name!(), Some(&$myself), $crate::call_site!())
    };
    ($logger:expr, info) => {
        $logger.info_function_start($crate::function_name!(), None, $crate::call_site!())
    };
    ($logger:expr, info, $myself:expr) => {
        $logger.info_function_start($crate::function_name!(), Some(&$myself), $crate::call_site!())
    };
}
