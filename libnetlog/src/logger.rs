/*
 * Default logger slot and facade functions
 *
 * This file implements:
 * - LoggerSlot, an owned and injectable holder of the active Logger
 * - The process-wide slot, lazily initialized to a console logger on stderr
 * - Free functions that delegate every call to the process-wide slot
 *
 * The slot is guarded by a reader-writer lock. Log calls clone the current
 * Arc under the read lock and write after releasing it, so replacing the
 * logger never waits on an in-flight write and every call completes against
 * one consistent logger.
 */

use once_cell::sync::Lazy;
use std::fmt;
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

use crate::config::{LoggerConfig, NetlogConfig};
use crate::contracts::{Logger, ProcessExit, Terminator};
use crate::error::LogError;
use crate::loader::LoggerLoader;
use crate::log_writer::LogWriter;
use crate::outputs::ConsoleOutput;

static DEFAULT_SLOT: Lazy<LoggerSlot> = Lazy::new(LoggerSlot::default);

/// The process-wide slot used by the free functions and macros.
pub fn default_slot() -> &'static LoggerSlot {
    &DEFAULT_SLOT
}

/// Holds the active [`Logger`] and swaps it on reconfiguration.
pub struct LoggerSlot {
    current: RwLock<Arc<dyn Logger>>,
    terminator: Arc<dyn Terminator>,
}

impl Default for LoggerSlot {
    fn default() -> Self {
        Self::with_terminator(Arc::new(ProcessExit))
    }
}

impl fmt::Debug for LoggerSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggerSlot").finish_non_exhaustive()
    }
}

impl LoggerSlot {
    pub fn new(logger: Arc<dyn Logger>) -> Self {
        LoggerSlot {
            current: RwLock::new(logger),
            terminator: Arc::new(ProcessExit),
        }
    }

    /// A slot starting on stderr whose loggers call `terminator` on `crit`.
    pub fn with_terminator(terminator: Arc<dyn Terminator>) -> Self {
        let console = LogWriter::new(ConsoleOutput::stderr(), false).with_terminator(terminator.clone());
        LoggerSlot {
            current: RwLock::new(Arc::new(console)),
            terminator,
        }
    }

    /// The logger in the slot right now.
    pub fn current(&self) -> Arc<dyn Logger> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Installs `logger` and returns the one it replaced.
    pub fn replace(&self, logger: Arc<dyn Logger>) -> Arc<dyn Logger> {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *current, logger)
    }

    /// Parses `url`, builds the matching logger and installs it with debug
    /// output disabled. On error the current logger is kept.
    pub fn set_output_url(&self, url: &str) -> Result<(), LogError> {
        self.set_output_url_with_debug(url, false)
    }

    pub fn set_output_url_with_debug(&self, url: &str, debug: bool) -> Result<(), LogError> {
        let config = LoggerConfig::from_url(url, debug)?;
        self.install(&config)
    }

    /// Builds and installs a logger for an already parsed configuration.
    pub fn install(&self, config: &LoggerConfig) -> Result<(), LogError> {
        let logger = LoggerLoader::load_with(config, self.terminator.clone())?;
        self.replace(logger);
        Ok(())
    }

    /// Reads a TOML configuration file and installs the logger it names.
    pub fn init_with_config_file(&self, path: impl AsRef<Path>) -> Result<(), LogError> {
        let config = NetlogConfig::from_file(path)?;
        self.install(&config.logger_config()?)
    }

    pub fn debug(&self, args: fmt::Arguments<'_>) {
        self.current().debug(args);
    }

    pub fn info(&self, args: fmt::Arguments<'_>) {
        self.current().info(args);
    }

    pub fn warning(&self, args: fmt::Arguments<'_>) {
        self.current().warning(args);
    }

    pub fn err(&self, args: fmt::Arguments<'_>) {
        self.current().err(args);
    }

    pub fn crit(&self, args: fmt::Arguments<'_>) {
        self.current().crit(args);
    }

    pub fn set_debug(&self, enabled: bool) {
        self.current().set_debug(enabled);
    }
}

/// Installs the logger described by `url` as the process-wide default.
///
/// Recognized schemes: `file`, `stderr`, `stdout`, `local-service` (or
/// `net`), `network` (or `tcp`, `tcp4`, `tcp6`, `udp`), `http`, `https`.
/// Query parameters: `facility`, `tag`, `debug`, and `timeout` (seconds,
/// HTTP only).
///
/// # Example
///
/// ```no_run
/// libnetlog::set_output_url("file:///var/log/myapp.log?facility=application&tag=myapp")?;
/// libnetlog::log_info!("started with {} workers", 4);
/// # Ok::<(), libnetlog::LogError>(())
/// ```
pub fn set_output_url(url: &str) -> Result<(), LogError> {
    DEFAULT_SLOT.set_output_url(url)
}

/// Same as [`set_output_url`], enabling debug output when `debug` is true.
pub fn set_output_url_with_debug(url: &str, debug: bool) -> Result<(), LogError> {
    DEFAULT_SLOT.set_output_url_with_debug(url, debug)
}

/// Installs the logger named by a TOML file's `[logging]` section.
pub fn init_with_config_file(path: impl AsRef<Path>) -> Result<(), LogError> {
    DEFAULT_SLOT.init_with_config_file(path)
}

/// Replaces the process-wide logger directly.
pub fn set_default_logger(logger: Arc<dyn Logger>) -> Arc<dyn Logger> {
    DEFAULT_SLOT.replace(logger)
}

/// Outputs debug level log output.
/// It is usually used to output detailed debug information.
/// If debug status is not enabled, no output is generated.
/// The debug status can be set from [`set_debug`].
pub fn debug(args: fmt::Arguments<'_>) {
    DEFAULT_SLOT.debug(args);
}

/// Outputs information level log output.
/// It is usually used to output interesting events.
pub fn info(args: fmt::Arguments<'_>) {
    DEFAULT_SLOT.info(args);
}

/// Outputs warning level log output.
/// It is usually used to output exceptional occurrences that are not errors.
pub fn warning(args: fmt::Arguments<'_>) {
    DEFAULT_SLOT.warning(args);
}

/// Outputs error level log output.
/// It is usually used for runtime errors that need no immediate action
/// but should be logged and monitored.
pub fn err(args: fmt::Arguments<'_>) {
    DEFAULT_SLOT.err(args);
}

/// Outputs critical level log output, then exits the process with status 2.
pub fn crit(args: fmt::Arguments<'_>) {
    DEFAULT_SLOT.crit(args);
}

/// Enables or disables debug output on the process-wide logger.
pub fn set_debug(enabled: bool) {
    DEFAULT_SLOT.set_debug(enabled);
}
