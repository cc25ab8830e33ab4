/*
 * Main library entry point that exposes the public API
 *
 * This file defines the public interface for the logging facade, including:
 * - Re-exporting the Logger contract, the backends and the LoggerSlot
 * - Re-exporting the configuration resolver (set_output_url) and config types
 * - Defining logging macros (log_debug, log_info, log_warning, log_err, log_crit)
 *
 * The macros take format arguments like `format!` and forward them to the
 * process-wide default logger.
 */

mod config;
mod contracts;
mod error;
mod loader;
mod log_writer;
mod logger;
pub mod outputs;

pub use config::{parse_facility, Facility, LoggerConfig, NetlogConfig, Output, Transport, UnknownFacility};
pub use contracts::{LogOutput, Logger, ProcessExit, Severity, Terminator, CRIT_EXIT_STATUS};
pub use error::LogError;
pub use loader::{ConsoleLogger, EventLogger, HttpLogger, LoggerLoader, SyslogLogger};
pub use log_writer::LogWriter;
pub use logger::{
    crit, debug, default_slot, err, info, init_with_config_file, set_debug, set_default_logger, set_output_url,
    set_output_url_with_debug, warning, LoggerSlot,
};

#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)+) => {
        $crate::debug(format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)+) => {
        $crate::info(format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! log_warning {
    ($($arg:tt)+) => {
        $crate::warning(format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! log_err {
    ($($arg:tt)+) => {
        $crate::err(format_args!($($arg)+))
    };
}

/// Logs at critical level, then exits the process with status 2.
#[macro_export]
macro_rules! log_crit {
    ($($arg:tt)+) => {
        $crate::crit(format_args!($($arg)+))
    };
}
