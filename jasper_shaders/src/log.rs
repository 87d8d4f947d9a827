//! Internal logging system for the Jasper shader pipeline
//!
//! This module provides a flexible logging system with:
//! - Customizable logger via Logger trait
//! - Severity levels (Trace, Debug, Info, Warn, Error)
//! - Colored console output by default
//! - Thread-safe logger replacement with RwLock
//! - File and line information for detailed ERROR logs

use chrono::{DateTime, Local};
use colored::*;
use std::sync::{OnceLock, RwLock};
use std::time::SystemTime;

/// Logger trait for custom logging implementations
///
/// Implement this trait to create custom loggers (file logging, capture
/// buffers for tests, etc.)
pub trait Logger: Send + Sync {
    /// Log an entry
    ///
    /// # Arguments
    ///
    /// * `entry` - The log entry to process
    fn log(&self, entry: &LogEntry);
}

/// Log entry containing all information about a log message
#[derive(Debug, Clone)]
pub struct LogEntry {
    /// Severity level (Trace, Debug, Info, Warn, Error)
    pub severity: LogSeverity,

    /// Timestamp when the log was created
    pub timestamp: SystemTime,

    /// Source module (e.g., "jasper::ShaderManager", "jasper::Reflector")
    pub source: String,

    /// Log message
    pub message: String,

    /// Source file (only for detailed ERROR logs)
    pub file: Option<&'static str>,

    /// Source line (only for detailed ERROR logs)
    pub line: Option<u32>,
}

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogSeverity {
    /// Very verbose debug information (typically disabled in release)
    Trace,

    /// Development/debugging information
    Debug,

    /// Important informational messages
    Info,

    /// Warning messages (potential issues)
    Warn,

    /// Error messages (critical issues with file:line details)
    Error,
}

/// Default logger implementation using colored console output
///
/// Format:
/// - Normal: `[timestamp] [SEVERITY] [source] message`
/// - Error: `[timestamp] [ERROR] [source] message (file:line)`
pub struct DefaultLogger;

impl Logger for DefaultLogger {
    fn log(&self, entry: &LogEntry) {
        // Format timestamp as YYYY-MM-DD HH:MM:SS.mmm
        let datetime: DateTime<Local> = entry.timestamp.into();
        let timestamp = datetime.format("%Y-%m-%d %H:%M:%S%.3f").to_string();

        // Color severity string
        let severity_str = match entry.severity {
            LogSeverity::Trace => "TRACE".bright_black(),
            LogSeverity::Debug => "DEBUG".cyan(),
            LogSeverity::Info => "INFO ".green(),
            LogSeverity::Warn => "WARN ".yellow(),
            LogSeverity::Error => "ERROR".red().bold(),
        };

        // Color source
        let source = entry.source.bright_blue();

        // Print with or without file:line
        if let (Some(file), Some(line)) = (entry.file, entry.line) {
            println!(
                "[{}] [{}] [{}] {} ({}:{})",
                timestamp, severity_str, source, entry.message, file, line
            );
        } else {
            println!("[{}] [{}] [{}] {}", timestamp, severity_str, source, entry.message);
        }
    }
}

// ===== GLOBAL LOGGER =====

/// Global logger (initialized with DefaultLogger on first use)
static LOGGER: OnceLock<RwLock<Box<dyn Logger>>> = OnceLock::new();

fn logger() -> &'static RwLock<Box<dyn Logger>> {
    LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)))
}

/// Replace the global logger
///
/// All pipeline log output from this point on goes through the given logger.
pub fn set_logger(new_logger: Box<dyn Logger>) {
    // A panicked logger must not silence the pipeline; recover the slot
    // instead of propagating the poison
    let mut slot = logger().write().unwrap_or_else(|e| e.into_inner());
    *slot = new_logger;
}

/// Dispatch a log entry to the global logger (internal use via macros)
pub fn dispatch(severity: LogSeverity, source: &str, message: String) {
    let entry = LogEntry {
        severity,
        timestamp: SystemTime::now(),
        source: source.to_string(),
        message,
        file: None,
        line: None,
    };
    let active = logger().read().unwrap_or_else(|e| e.into_inner());
    active.log(&entry);
}

/// Dispatch a log entry with file:line details (internal use via macros)
pub fn dispatch_detailed(
    severity: LogSeverity,
    source: &str,
    message: String,
    file: &'static str,
    line: u32,
) {
    let entry = LogEntry {
        severity,
        timestamp: SystemTime::now(),
        source: source.to_string(),
        message,
        file: Some(file),
        line: Some(line),
    };
    let active = logger().read().unwrap_or_else(|e| e.into_inner());
    active.log(&entry);
}

// ===== LOGGING MACROS =====

/// Log a TRACE message (very verbose, typically disabled)
///
/// # Example
///
/// ```no_run
/// # use jasper_shaders::jasper_trace;
/// jasper_trace!("jasper::ShaderManager", "Visiting source file");
/// ```
#[macro_export]
macro_rules! jasper_trace {
    ($source:expr, $($arg:tt)*) => {
        $crate::log::dispatch(
            $crate::log::LogSeverity::Trace,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log a DEBUG message (development information)
///
/// # Example
///
/// ```no_run
/// # use jasper_shaders::jasper_debug;
/// jasper_debug!("jasper::ShaderManager", "Cache hit for {}", "triangle.vert.glsl");
/// ```
#[macro_export]
macro_rules! jasper_debug {
    ($source:expr, $($arg:tt)*) => {
        $crate::log::dispatch(
            $crate::log::LogSeverity::Debug,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log an INFO message (important events)
///
/// # Example
///
/// ```no_run
/// # use jasper_shaders::jasper_info;
/// jasper_info!("jasper::ShaderManager", "Loaded {} shader files from cache", 4);
/// ```
#[macro_export]
macro_rules! jasper_info {
    ($source:expr, $($arg:tt)*) => {
        $crate::log::dispatch(
            $crate::log::LogSeverity::Info,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log a WARN message (potential issues)
///
/// # Example
///
/// ```no_run
/// # use jasper_shaders::jasper_warn;
/// jasper_warn!("jasper::CacheIndex", "Stale cache entry dropped");
/// ```
#[macro_export]
macro_rules! jasper_warn {
    ($source:expr, $($arg:tt)*) => {
        $crate::log::dispatch(
            $crate::log::LogSeverity::Warn,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log an ERROR message with file:line information
///
/// # Example
///
/// ```no_run
/// # use jasper_shaders::jasper_error;
/// jasper_error!("jasper::ShaderCompiler", "Compilation failed: {}", "syntax error");
/// ```
#[macro_export]
macro_rules! jasper_error {
    ($source:expr, $($arg:tt)*) => {
        $crate::log::dispatch_detailed(
            $crate::log::LogSeverity::Error,
            $source,
            format!($($arg)*),
            file!(),
            line!()
        )
    };
}

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;
