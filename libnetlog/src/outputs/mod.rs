/*
 * Log output implementations
 *
 * This module defines the logging backends:
 * - ConsoleOutput: timestamped lines on a stream or an append-mode file
 * - SyslogOutput: the local syslog service or a remote syslog receiver
 * - EventLogOutput: a structured event store (the Windows event log in production)
 * - HttpOutput: JSON posts to a log collector
 *
 * Each output implements the LogOutput trait and is wrapped in a LogWriter
 * to become a Logger.
 */

mod console;
mod eventlog;
mod http;
mod syslog;

pub use console::ConsoleOutput;
pub use eventlog::{EventKind, EventLogOutput, EventSink};
#[cfg(windows)]
pub use eventlog::WindowsEventLog;
pub use http::HttpOutput;
pub use syslog::SyslogOutput;
