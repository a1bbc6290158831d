use std::env;
use std::process;
use std::sync::{Arc, Barrier};
use std::thread;
use letter_log::{
    call_site, global_pool, log_error, log_function_start, log_info, log_warning, Logger,
    LogConfig, StdoutSink,
};

const DEFAULT_WORKERS: usize = 30;

struct Job {
    id: usize,
}

impl std::fmt::Display for Job {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "job {}", self.id)
    }
}

fn run_job(logger: &Logger, job: &Job) {
    log_function_start!(logger, debug, job);
    if job.id % 7 == 6 {
        log_warning!(logger, "{} took the slow path", job);
    }
    log::info!("{} done", job);
}

fn main() {
    let workers = match env::args().nth(1).map(|arg| arg.parse::<usize>()) {
        None => DEFAULT_WORKERS,
        Some(Ok(n)) => n,
        Some(Err(err)) => {
            eprintln!("invalid worker count: {}", err);
            process::exit(2);
        }
    };

    let config = match LogConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{}", err);
            process::exit(2);
        }
    };

    // One logger behind the `log` facade, one used directly
    if let Err(err) = letter_log::init(Logger::new(config, StdoutSink)) {
        eprintln!("could not install logger: {}", err);
    }
    let logger = Arc::new(Logger::new(config, StdoutSink));

    log_info!(logger, "starting {} workers", workers);

    // Hold every worker until all have their letter, so more than 26 show '+'
    let barrier = Arc::new(Barrier::new(workers));
    let handles: Vec<_> = (0..workers)
        .map(|id| {
            let logger = Arc::clone(&logger);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                logger.debug("ready", call_site!());
                barrier.wait();
                run_job(&logger, &Job { id });
            })
        })
        .collect();

    for handle in handles {
        if handle.join().is_err() {
            log_error!(logger, "worker panicked");
        }
    }

    log_info!(logger, "all workers done, {} slots in use", global_pool().in_use());
    logger.flush();
}
