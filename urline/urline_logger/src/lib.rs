//! Minimal logger usable from both no_std and hosted environments, with
//! colored output per severity level. Also home of the [`OutputSink`] trait
//! shared between the logger and the line editor, so both write through the
//! same byte sink.

#![cfg_attr(not(feature = "hosted"), no_std)]

use core::fmt::{self, Write};

#[cfg(feature = "hosted")]
use std::sync::{Mutex, OnceLock};

#[cfg(not(feature = "hosted"))]
use core::cell::RefCell;

#[cfg(not(feature = "hosted"))]
use critical_section::Mutex;

// Re-exports needed by the logging macros ($crate:: paths).
#[cfg(feature = "heapless")]
pub use heapless;
pub use core::fmt::Write as FmtWrite;

/// Upper bound for one formatted log line in the macros.
pub const LOG_LINE_MAX: usize = 256;

// ANSI color codes
const RESET: &str = "\x1b[0m";
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const GREEN: &str = "\x1b[32m";
const BLUE: &str = "\x1b[94m";
const GRAY: &str = "\x1b[90m";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    #[inline]
    pub const fn color(&self) -> &'static str {
        match self {
            LogLevel::Error => RED,
            LogLevel::Warn => YELLOW,
            LogLevel::Info => GREEN,
            LogLevel::Debug => BLUE,
            LogLevel::Trace => GRAY,
        }
    }

    #[inline]
    pub const fn label(&self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warn => " WARN",
            LogLevel::Info => " INFO",
            LogLevel::Debug => "DEBUG",
            LogLevel::Trace => "TRACE",
        }
    }

    /// Allows early exit before string formatting.
    #[inline]
    pub const fn is_enabled(&self, min_level: LogLevel) -> bool {
        (*self as u8) <= (min_level as u8)
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.color(), self.label(), RESET)
    }
}

// ============================================================================
// Output sink trait, shared by the logger and the line editor
// ============================================================================

/// Universal byte/string sink. The line editor drives the terminal through
/// this, and the no_std logger writes its lines through it too.
pub trait OutputSink {
    /// Write a string slice
    fn write_str(&mut self, s: &str);

    /// Write raw bytes
    fn write_bytes(&mut self, bytes: &[u8]);

    /// Flush the output (if buffered)
    fn flush(&mut self);
}

// Anything that can take formatted text can serve as a sink.
impl<T: fmt::Write> OutputSink for T {
    fn write_str(&mut self, s: &str) {
        let _ = <Self as fmt::Write>::write_str(self, s);
    }

    fn write_bytes(&mut self, bytes: &[u8]) {
        if let Ok(s) = core::str::from_utf8(bytes) {
            let _ = OutputSink::write_str(self, s);
        }
    }

    fn flush(&mut self) {}
}

/// Sink for log output. `Send` is required so the sink can live in the
/// global logger.
pub trait LogSink: OutputSink + Send {
    fn write_log(&mut self, level: LogLevel, message: &str, color_entire_line: bool) {
        if color_entire_line {
            self.write_str(level.color());
            self.write_str("[");
            self.write_str(level.label());
            self.write_str("] ");
            self.write_str(message);
            self.write_str(RESET);
            self.write_str("\r\n");
        } else {
            self.write_str("[");
            self.write_str(level.color());
            self.write_str(level.label());
            self.write_str(RESET);
            self.write_str("] ");
            self.write_str(message);
            self.write_str("\r\n");
        }
        self.flush();
    }
}

impl<T: OutputSink + Send> LogSink for T {}

/// Logger configuration
pub struct LoggerConfig {
    pub color_entire_line: bool,
    pub min_level: LogLevel,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            color_entire_line: false,
            min_level: LogLevel::Info,
        }
    }
}

// ============================================================================
// Hosted global logger (std)
// ============================================================================

#[cfg(feature = "hosted")]
static GLOBAL_LOGGER: OnceLock<Mutex<LoggerConfig>> = OnceLock::new();

#[cfg(feature = "hosted")]
pub fn init_logger(config: LoggerConfig) {
    let _ = GLOBAL_LOGGER.set(Mutex::new(config));
}

#[cfg(feature = "hosted")]
pub fn set_min_level(level: LogLevel) {
    if let Some(logger) = GLOBAL_LOGGER.get() {
        if let Ok(mut guard) = logger.lock() {
            guard.min_level = level;
        }
    }
}

#[cfg(feature = "hosted")]
pub fn log_with_level(level: LogLevel, message: &str) {
    if let Some(logger) = GLOBAL_LOGGER.get() {
        if let Ok(guard) = logger.lock() {
            if !level.is_enabled(guard.min_level) {
                return;
            }
            if guard.color_entire_line {
                println!("{}[{}] {}{}", level.color(), level.label(), message, RESET);
            } else {
                println!("[{}] {}", level, message);
            }
        }
    }
}

// ============================================================================
// no_std global logger, writing through a LogSink
// ============================================================================

#[cfg(not(feature = "hosted"))]
struct GlobalLogger {
    config: LoggerConfig,
    sink: &'static mut dyn LogSink,
}

#[cfg(not(feature = "hosted"))]
static GLOBAL_LOGGER: Mutex<RefCell<Option<GlobalLogger>>> = Mutex::new(RefCell::new(None));

#[cfg(not(feature = "hosted"))]
pub fn init_logger(config: LoggerConfig, sink: &'static mut dyn LogSink) {
    critical_section::with(|cs| {
        *GLOBAL_LOGGER.borrow_ref_mut(cs) = Some(GlobalLogger { config, sink });
    });
}

#[cfg(not(feature = "hosted"))]
pub fn set_min_level(level: LogLevel) {
    critical_section::with(|cs| {
        if let Some(logger) = GLOBAL_LOGGER.borrow_ref_mut(cs).as_mut() {
            logger.config.min_level = level;
        }
    });
}

#[cfg(not(feature = "hosted"))]
pub fn log_with_level(level: LogLevel, message: &str) {
    critical_section::with(|cs| {
        if let Some(logger) = GLOBAL_LOGGER.borrow_ref_mut(cs).as_mut() {
            if level.is_enabled(logger.config.min_level) {
                logger
                    .sink
                    .write_log(level, message, logger.config.color_entire_line);
            }
        }
    });
}

// ============================================================================
// Logging macros
// ============================================================================

// The macros format into a fixed heapless line buffer, so they work the same
// in no_std and hosted builds; overlong lines are truncated.

#[macro_export]
macro_rules! log {
    ($level:expr, $($arg:tt)*) => {{
        use $crate::FmtWrite as _;
        let mut line = $crate::heapless::String::<{ $crate::LOG_LINE_MAX }>::new();
        let _ = ::core::write!(&mut line, $($arg)*);
        $crate::log_with_level($level, line.as_str());
    }};
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        $crate::log!($crate::LogLevel::Error, $($arg)*)
    };
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        $crate::log!($crate::LogLevel::Warn, $($arg)*)
    };
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        $crate::log!($crate::LogLevel::Info, $($arg)*)
    };
}

#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        $crate::log!($crate::LogLevel::Debug, $($arg)*)
    };
}

#[macro_export]
macro_rules! log_trace {
    ($($arg:tt)*) => {
        $crate::log!($crate::LogLevel::Trace, $($arg)*)
    };
}

// ==================================================
// ==================== TESTS =======================
// ==================================================
