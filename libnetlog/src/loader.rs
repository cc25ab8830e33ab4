use std::sync::Arc;

use crate::config::{LoggerConfig, Output};
use crate::contracts::{Logger, ProcessExit, Terminator};
use crate::error::LogError;
use crate::log_writer::LogWriter;
use crate::outputs::{ConsoleOutput, EventLogOutput, HttpOutput, SyslogOutput};

/// Console logger on a stream or file.
pub type ConsoleLogger = LogWriter<ConsoleOutput>;
/// Syslog logger, local or remote.
pub type SyslogLogger = LogWriter<SyslogOutput>;
/// Structured event store logger.
pub type EventLogger<S> = LogWriter<EventLogOutput<S>>;
/// JSON-over-HTTP logger.
pub type HttpLogger = LogWriter<HttpOutput>;

impl ConsoleLogger {
    /// The logger every process starts with.
    pub fn stderr() -> Self {
        LogWriter::new(ConsoleOutput::stderr(), false)
    }
}

/// Builds concrete loggers from a parsed configuration.
pub struct LoggerLoader;

impl LoggerLoader {
    pub fn load(config: &LoggerConfig) -> Result<Arc<dyn Logger>, LogError> {
        Self::load_with(config, Arc::new(ProcessExit))
    }

    /// Like [`LoggerLoader::load`], with the terminator `crit` should use.
    pub fn load_with(config: &LoggerConfig, terminator: Arc<dyn Terminator>) -> Result<Arc<dyn Logger>, LogError> {
        let debug = config.debug;

        let logger: Arc<dyn Logger> = match &config.output {
            Output::File(path) => {
                let output = ConsoleOutput::open_file(path)?;
                Arc::new(LogWriter::new(output, debug).with_terminator(terminator))
            }
            Output::Stderr => Arc::new(LogWriter::new(ConsoleOutput::stderr(), debug).with_terminator(terminator)),
            Output::Stdout => Arc::new(LogWriter::new(ConsoleOutput::stdout(), debug).with_terminator(terminator)),
            Output::LocalService => Self::local_service(config, terminator)?,
            Output::Network { transport, addr } => {
                let output = SyslogOutput::remote(*transport, addr, config.facility, &config.tag_or_default())?;
                Arc::new(LogWriter::new(output, debug).with_terminator(terminator))
            }
            Output::Http { endpoint, timeout } => {
                let output = HttpOutput::new(endpoint.clone(), *timeout, config.facility, &config.tag_or_default())?;
                Arc::new(LogWriter::new(output, debug).with_terminator(terminator))
            }
        };

        Ok(logger)
    }

    #[cfg(unix)]
    fn local_service(config: &LoggerConfig, terminator: Arc<dyn Terminator>) -> Result<Arc<dyn Logger>, LogError> {
        let output = SyslogOutput::local(config.facility, &config.tag_or_default())?;
        Ok(Arc::new(LogWriter::new(output, config.debug).with_terminator(terminator)))
    }

    #[cfg(windows)]
    fn local_service(config: &LoggerConfig, terminator: Arc<dyn Terminator>) -> Result<Arc<dyn Logger>, LogError> {
        use crate::outputs::WindowsEventLog;

        let sink = WindowsEventLog::open(&config.tag_or_default())?;
        Ok(Arc::new(
            LogWriter::new(EventLogOutput::new(sink), config.debug).with_terminator(terminator),
        ))
    }

    #[cfg(not(any(unix, windows)))]
    fn local_service(_: &LoggerConfig, _: Arc<dyn Terminator>) -> Result<Arc<dyn Logger>, LogError> {
        Err(LogError::BackendUnavailable(std::io::Error::new(
            std::io::ErrorKind::Unsupported,
            "no local logging service on this platform",
        )))
    }
}
