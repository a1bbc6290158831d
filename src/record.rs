use std::fmt;
use chrono::{Local, NaiveTime};
use crate::level::Level;

/// Renders one log line from its parts.
///
/// Line layout, fields separated by single spaces:
///
/// ```text
/// HH:mm:ss.SSS <letter> <LEVEL> <basename>(<line>): <message>
/// ```
///
/// The timestamp is local wall-clock time with millisecond precision, always
/// zero padded and always 24-hour, whatever the host locale.

/// `chrono` format string for the timestamp field.
pub const TIMESTAMP_FORMAT: &str = "%H:%M:%S%.3f";

/// Where a log call was made.
///
/// Usually built by the [`call_site!`](crate::call_site) macro, but any file
/// path and line number can be supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallSite<'a> {
    pub file: &'a str,
    pub line: u32,
}

impl<'a> CallSite<'a> {
    pub const fn new(file: &'a str, line: u32) -> Self {
        Self { file, line }
    }

    /// The last path component of `file`, splitting on `/` and `\`.
    pub fn basename(&self) -> &'a str {
        basename(self.file)
    }
}

impl fmt::Display for CallSite<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.basename(), self.line)
    }
}

/// Strips directories from a source path.
///
/// # Examples
///
/// ```
/// # use letter_log::record::basename;
/// assert_eq!(basename("src/net/server.rs"), "server.rs");
/// assert_eq!(basename(r"C:\work\main.rs"), "main.rs");
/// assert_eq!(basename("lib.rs"), "lib.rs");
/// ```
pub fn basename(path: &str) -> &str {
    path.rsplit(&['/', '\\'][..]).next().unwrap_or(path)
}

/// Builds the message of a function-start record.
///
/// Renders `Start <function> (<myself>)`, or `Start <function>` without a
/// description.
pub fn function_start_message(function: &str, myself: Option<&dyn fmt::Display>) -> String {
    match myself {
        Some(myself) => format!("Start {} ({})", function, myself),
        None => format!("Start {}", function),
    }
}

/// A fully resolved log record, ready to render.
#[derive(Clone, Copy)]
pub struct LogRecord<'a> {
    pub time: NaiveTime,
    pub thread_letter: char,
    pub level: Level,
    pub call_site: CallSite<'a>,
    pub message: &'a dyn fmt::Display,
}

impl<'a> LogRecord<'a> {
    /// Creates a record stamped with the current local time.
    pub fn now(
        thread_letter: char,
        level: Level,
        call_site: CallSite<'a>,
        message: &'a dyn fmt::Display,
    ) -> Self {
        Self {
            time: Local::now().time(),
            thread_letter,
            level,
            call_site,
            message,
        }
    }
}

impl fmt::Display for LogRecord<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}: {}",
            self.time.format(TIMESTAMP_FORMAT),
            self.thread_letter,
            self.level.tag(),
            self.call_site,
            self.message
        )
    }
}

/// Returns the name of the enclosing function.
///
/// Closures report the function they are defined in.
#[macro_export]
macro_rules! function_name {
    () => {{
        fn __here() {}
        fn __type_name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        let mut name = __type_name_of(__here);
        name = name.strip_suffix("::__here").unwrap_or(name);
        while let Some(outer) = name.strip_suffix("::{{closure}}") {
            name = outer;
        }
        name.rsplit("::").next().unwrap_or(name)
    }};
}

/// Captures the current source file and line as a [`CallSite`].
#[macro_export]
macro_rules! call_site {
    () => {
        $crate::record::CallSite::new(file!(), line!())
    };
}
