#![warn(clippy::all, rust_2018_idioms)]

/// Unified logging macros with file, module, and line context.
/// Records go through `tracing` only; dependencies that log through the `log`
/// facade reach the same subscriber via the `tracing-log` bridge.
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        tracing::debug!("[{}:{}:{}] {}", file!(), module_path!(), line!(), format!($($arg)*));
    };
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        tracing::info!("[{}:{}:{}] {}", file!(), module_path!(), line!(), format!($($arg)*));
    };
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        tracing::warn!("[{}:{}:{}] {}", file!(), module_path!(), line!(), format!($($arg)*));
    };
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        tracing::error!("[{}:{}:{}] {}", file!(), module_path!(), line!(), format!($($arg)*));
    };
}

/// Trace-level variants for per-page and per-record detail.
#[macro_export]
macro_rules! trace_trace {
    ($($arg:tt)*) => {
        tracing::trace!("[{}:{}:{}] {}", file!(), module_path!(), line!(), format!($($arg)*));
    };
}

#[macro_export]
macro_rules! trace_debug {
    ($($arg:tt)*) => {
        tracing::debug!("[{}:{}:{}] {}", file!(), module_path!(), line!(), format!($($arg)*));
    };
}

/*
Log level guidelines for the datasource:

TRACE: individual pages and tokens while paginating
DEBUG: mode selection, client registry hits and misses, per-target progress
INFO:  request summaries (targets processed, rows produced)
WARN:  pagination truncated by configured limits, skipped targets
ERROR: failed requests turned into inline error results
*/
