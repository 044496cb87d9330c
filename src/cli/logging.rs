//! Logging initialization

use std::path::PathBuf;

/// Initialize logging based on debug flag
///
/// Debug logs go to a temp file so stdout stays clean for command output.
/// Returns the log file path if debug logging is enabled.
pub fn init_logging(debug: bool) -> Option<PathBuf> {
    // No logging by default (silent operation)
    if !debug {
        return None;
    }

    // Named temp file from the tempfile crate works on every platform.
    // keep() detaches it from the guard so the log survives process exit
    // and can be read after a failed run.
    let (file, path) = match tempfile::Builder::new()
        .prefix("podfs-")
        .suffix(".log")
        .tempfile()
        .and_then(|file| file.keep().map_err(|e| e.error))
    {
        Ok(kept) => kept,
        Err(e) => {
            // Not fatal: the command still runs, only without a log
            eprintln!("Can't create debug log file: {e}");
            return None;
        }
    };

    // Write to the file so stdout carries only listings and file content.
    // RUST_LOG overrides the default debug filter, e.g. RUST_LOG=podfs=trace
    tracing_subscriber::fmt()
        .with_writer(file)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
        )
        .with_ansi(false) // No ANSI codes in log file
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    Some(path)
}
