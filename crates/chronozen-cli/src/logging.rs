//! Log setup.
//!
//! One-shot commands log to stderr. The interactive shell owns the terminal,
//! so it logs to a daily file under `<data_dir>/logs` instead.

use chronozen_core::storage::{data_dir, Config};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::Rotation;
use tracing_subscriber::EnvFilter;

const LOG_PREFIX: &str = "chronozen";

/// Install the global subscriber. Keep the returned guard alive for the
/// life of the process so buffered file output is flushed.
pub fn init(interactive: bool) -> Option<WorkerGuard> {
    let filter = filter();

    if interactive {
        let appender = data_dir().ok().and_then(|dir| {
            tracing_appender::rolling::Builder::new()
                .rotation(Rotation::DAILY)
                .max_log_files(5)
                .filename_prefix(LOG_PREFIX)
                .filename_suffix("log")
                .build(dir.join("logs"))
                .ok()
        })?;
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(writer)
            .try_init();
        Some(guard)
    } else {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
        None
    }
}

/// CHRONOZEN_LOG, then RUST_LOG, then `logging.level` from the config file
/// applied to our own crates.
fn filter() -> EnvFilter {
    for var in ["CHRONOZEN_LOG", "RUST_LOG"] {
        if let Ok(directives) = std::env::var(var) {
            if let Ok(filter) = EnvFilter::try_new(&directives) {
                return filter;
            }
        }
    }
    let level = Config::load_or_default().logging.level;
    EnvFilter::try_new(format!("chronozen_core={level},chronozen={level}"))
        .unwrap_or_else(|_| EnvFilter::new("chronozen_core=warn,chronozen=warn"))
}
