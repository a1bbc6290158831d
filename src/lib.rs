//! # Letter Log
//!
//! A small line logger that tags every record with a one-character thread
//! identifier, so interleaved output from many threads stays readable:
//!
//! ```text
//! 14:03:27.512 M INFO  main.rs(40): starting 3 workers
//! 14:03:27.513 a DEBUG worker.rs(12): Start run (job 1)
//! 14:03:27.513 b WARN  worker.rs(31): queue is empty
//! 14:03:27.514 + ERROR worker.rs(35): disk full
//! ```
//!
//! ## Thread Letters
//!
//! * `M` is the primary thread. It never uses a pool slot.
//! * `a`..`z` come from a shared pool of 26 slots. A thread takes one on its
//!   first log call and gives it back when it exits. Slots are handed out
//!   round-robin, so a freed letter is not immediately reused.
//! * `+` is shown by threads that asked while all 26 slots were taken. They
//!   keep `+` for the rest of their life.
//!
//! Threads not started through `std::thread` may never run thread-local
//! destructors. Those must call [`release_current_thread`] before exiting or
//! their slot is lost to the pool for the rest of the process.
//!
//! ## Main Components
//!
//! * `thread_letter`: the slot pool and the handle that owns a slot
//! * `thread_registry`: per-thread lookup through thread-local storage
//! * `record`: call sites and line rendering
//! * `logger`: level gating and the logging macros
//! * `sink`: where lines go
//! * `facade`: `log` crate integration
//!
//! ## Quick Start
//!
//! ```
//! use letter_log::{log_info, log_warning, Logger, LogConfig, MemorySink};
//!
//! let sink = MemorySink::new();
//! let logger = Logger::new(LogConfig::default(), sink.clone());
//!
//! log_info!(logger, "listening on port {}", 8080);
//! std::thread::spawn(move || {
//!     log_warning!(logger, "slow request");
//! }).join().unwrap();
//!
//! assert_eq!(sink.len(), 2);
//! ```

pub mod thread_letter;
pub mod thread_registry;
pub mod level;
pub mod config;
pub mod record;
pub mod sink;
pub mod logger;
pub mod facade;

pub use thread_letter::{global_pool, IdentifierPool, SlotAssignment, ThreadIdentifierHandle};
pub use thread_registry::{
    current_thread_letter, designate_primary_thread, is_primary_thread, release_current_thread,
};
pub use level::Level;
pub use config::{ConfigError, LogConfig};
pub use record::{CallSite, LogRecord};
pub use sink::{LogSink, MemorySink, NullSink, StderrSink, StdoutSink, WriterSink};
pub use logger::Logger;
pub use facade::init;
