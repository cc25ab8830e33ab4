/*
 * Logger contracts
 *
 * Defines the pieces every backend agrees on:
 * - Severity, with its syslog code, console header and event log id
 * - LogOutput, the write path of a single destination
 * - Logger, the six operations application code calls
 * - Terminator, the capability crit uses to end the process
 */

use std::fmt;
use std::io;

/// Exit status used by every `crit` call.
pub const CRIT_EXIT_STATUS: i32 = 2;

/// Message severity, ordered by increasing urgency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Debug,
    Info,
    Warning,
    Err,
    Crit,
}

impl Severity {
    /// Syslog severity number (RFC 3164).
    pub fn syslog_code(self) -> u8 {
        match self {
            Severity::Debug => 7,
            Severity::Info => 6,
            Severity::Warning => 4,
            Severity::Err => 3,
            Severity::Crit => 2,
        }
    }

    /// Prefix written by stream backends. All headers have the same width.
    pub fn header(self) -> &'static str {
        match self {
            Severity::Debug => "debug: ",
            Severity::Info => "info:  ",
            Severity::Warning => "warn:  ",
            Severity::Err => "error: ",
            Severity::Crit => "crit:  ",
        }
    }

    /// Event id reported to a structured event store.
    pub fn event_id(self) -> u32 {
        match self {
            Severity::Debug | Severity::Info => 1001,
            Severity::Warning => 2001,
            Severity::Err => 3001,
            Severity::Crit => 4001,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Debug => "debug",
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Err => "error",
            Severity::Crit => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single log destination. Implementations serialize their own writes so
/// that one call produces one complete line.
pub trait LogOutput: Send + Sync {
    fn write_log(&self, severity: Severity, message: &str) -> io::Result<()>;
}

/// The capability set shared by every backend.
pub trait Logger: Send + Sync {
    /// Emits only while debug output is enabled.
    fn debug(&self, args: fmt::Arguments<'_>);
    fn info(&self, args: fmt::Arguments<'_>);
    fn warning(&self, args: fmt::Arguments<'_>);
    /// A condition worth monitoring. Does not stop the process.
    fn err(&self, args: fmt::Arguments<'_>);
    /// Emits the message, then terminates the process with
    /// [`CRIT_EXIT_STATUS`].
    fn crit(&self, args: fmt::Arguments<'_>);
    fn set_debug(&self, enabled: bool);
}

impl fmt::Debug for dyn Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Logger")
    }
}

/// Ends the process on behalf of `crit`.
pub trait Terminator: Send + Sync {
    fn terminate(&self, code: i32);
}

/// Terminator that exits the current process.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessExit;

impl Terminator for ProcessExit {
    fn terminate(&self, code: i32) {
        std::process::exit(code)
    }
}
