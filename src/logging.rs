//! Logging initialization.
//!
//! Structured logging via `tracing`. The interactive showcase owns the
//! terminal in raw mode, so it logs to a file; headless runs log to stderr
//! next to the transcript on stdout. `SIMBIAN_LOG` overrides the `-v` count.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "SIMBIAN_LOG";

/// Where log lines go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    File(PathBuf),
}

/// Maps a verbosity level to a tracing directive string.
///
/// - 0 → `"warn"`
/// - 1 → `"info"`
/// - 2 → `"debug"`
/// - 3+ → `"trace"` (saturates)
#[must_use]
pub const fn verbosity_to_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Installs the global subscriber. Uses `try_init()`, so a second call is a
/// no-op. A log file that cannot be created is reported on stderr and logging
/// is disabled rather than aborting the run.
pub fn init_logging(target: &LogTarget, verbosity: u8) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(verbosity_to_directive(verbosity)));
    let show_target = verbosity >= 2;

    match target {
        LogTarget::Stderr => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(show_target)
                .with_writer(std::io::stderr)
                .try_init();
        }
        LogTarget::File(path) => match open_log(path) {
            Ok(file) => {
                let _ = tracing_subscriber::fmt()
                    .with_env_filter(filter)
                    .with_ansi(false)
                    .with_target(show_target)
                    .with_writer(Mutex::new(file))
                    .try_init();
            }
            Err(e) => eprintln!("Could not open log file {}: {e}", path.display()),
        },
    }
}

fn open_log(path: &Path) -> std::io::Result<File> {
    File::options().create(true).append(true).open(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_levels() {
        assert_eq!(verbosity_to_directive(0), "warn");
        assert_eq!(verbosity_to_directive(1), "info");
        assert_eq!(verbosity_to_directive(2), "debug");
        assert_eq!(verbosity_to_directive(3), "trace");
        assert_eq!(verbosity_to_directive(255), "trace");
    }

    #[test]
    fn init_logging_does_not_panic() {
        init_logging(&LogTarget::Stderr, 0);
        init_logging(&LogTarget::Stderr, 3);
    }

    #[test]
    fn unopenable_log_file_is_not_fatal() {
        let dir = std::env::temp_dir().join("simbian-showcase-no-such-dir").join("x");
        init_logging(&LogTarget::File(dir.join("showcase.log")), 1);
    }
}
