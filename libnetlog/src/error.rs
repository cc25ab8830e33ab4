/*
 * Error types for the logging facade
 *
 * Every failure the configuration resolver can report lives here. Log calls
 * themselves never return errors; write failures are reported on stderr.
 */

use std::io;
use std::path::PathBuf;

use crate::config::UnknownFacility;

/// Errors returned while resolving or installing a logger.
#[derive(Debug, thiserror::Error)]
pub enum LogError {
    /// The configuration string is not a well-formed URL.
    #[error("Failed to parse output url: {0}")]
    Parse(#[from] url::ParseError),

    /// The `facility` query value is not one of the recognized names.
    #[error(transparent)]
    UnknownFacility(#[from] UnknownFacility),

    /// The URL scheme does not name a known backend.
    #[error("Unsupported scheme '{0}'")]
    UnsupportedScheme(String),

    /// A URL component or query parameter has an unusable value.
    #[error("Invalid value '{value}' for '{name}'")]
    InvalidParameter { name: &'static str, value: String },

    /// The log file could not be opened for append.
    #[error("Failed to open log file '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The local logging service could not be reached.
    #[error("Local logging service unavailable: {0}")]
    BackendUnavailable(#[source] io::Error),

    /// The remote log receiver could not be reached.
    #[error("Failed to connect to log receiver '{addr}': {source}")]
    Connection {
        addr: String,
        #[source]
        source: io::Error,
    },

    /// The configuration file could not be parsed.
    #[error("Invalid logging configuration: {0}")]
    Config(String),
}
