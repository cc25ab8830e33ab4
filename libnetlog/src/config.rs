/*
 * Configuration management for the logging facade
 *
 * This module handles:
 * - The Facility enum and its case-insensitive lookup table
 * - Parsing a URL-shaped configuration string into a LoggerConfig
 * - Loading the output URL from a TOML file (app_config.toml style)
 *
 * The configuration determines:
 * - Where logs are written (file or stream, local service, network receiver, HTTP collector)
 * - Which facility and tag the destination sees
 * - Whether debug messages are emitted
 */

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use url::Url;

use crate::error::LogError;

const DEFAULT_HTTP_TIMEOUT_SECONDS: u64 = 30;

/// Query keys consumed by the resolver. Everything else is left on HTTP endpoints.
const RESERVED_KEYS: [&str; 4] = ["facility", "tag", "debug", "timeout"];

/// Origin category used by OS logging services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Facility {
    System,
    #[default]
    Application,
    Service,
    Security,
}

impl Facility {
    /// Syslog facility code, already shifted into the priority byte.
    pub fn syslog_code(self) -> u8 {
        match self {
            Facility::System => 0,           // LOG_KERN
            Facility::Application => 1 << 3, // LOG_USER
            Facility::Service => 3 << 3,     // LOG_DAEMON
            Facility::Security => 10 << 3,   // LOG_AUTHPRIV
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Facility::System => "system",
            Facility::Application => "application",
            Facility::Service => "service",
            Facility::Security => "security",
        }
    }
}

impl fmt::Display for Facility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a facility name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown facility '{value}'")]
pub struct UnknownFacility {
    value: String,
}

impl UnknownFacility {
    pub fn value(&self) -> &str {
        &self.value
    }

    /// The facility callers should fall back to.
    pub fn fallback(&self) -> Facility {
        Facility::System
    }
}

/// Resolves a facility name, ignoring case.
pub fn parse_facility(s: &str) -> Result<Facility, UnknownFacility> {
    match s.to_lowercase().as_str() {
        "sys" | "system" => Ok(Facility::System),
        "app" | "application" => Ok(Facility::Application),
        "service" => Ok(Facility::Service),
        "security" => Ok(Facility::Security),
        _ => Err(UnknownFacility {
            value: s.to_string(),
        }),
    }
}

impl FromStr for Facility {
    type Err = UnknownFacility;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_facility(s)
    }
}

/// Socket type used to reach a remote receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    /// TCP over whichever address family resolves first.
    Tcp,
    Tcp4,
    Tcp6,
    Udp,
}

/// Destination selected by the URL scheme.
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    /// `file://`: append to a file.
    File(PathBuf),
    /// `stderr://`
    Stderr,
    /// `stdout://`
    Stdout,
    /// `local-service://` or `net://`: the local OS logging channel.
    LocalService,
    /// `network://`, `tcp://`, `tcp4://`, `tcp6://`, `udp://`: a syslog receiver.
    Network { transport: Transport, addr: String },
    /// `http://` or `https://`: a JSON log collector.
    Http { endpoint: Url, timeout: Duration },
}

/// Parsed form of an output URL.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggerConfig {
    pub output: Output,
    pub facility: Facility,
    /// Identifies the emitting process at the destination. May be empty.
    pub tag: String,
    pub debug: bool,
}

impl LoggerConfig {
    /// Parses `<scheme>://<host><path>?facility=<f>&tag=<t>`.
    ///
    /// A `debug` query parameter is ORed into `debug`.
    pub fn from_url(s: &str, debug: bool) -> Result<Self, LogError> {
        let url = Url::parse(s)?;

        let mut facility = Facility::default();
        let mut tag = String::new();
        let mut debug = debug;

        for (key, value) in url.query_pairs() {
            match &*key {
                "facility" if !value.is_empty() => facility = parse_facility(&value)?,
                "tag" => tag = value.into_owned(),
                "debug" => debug |= parse_bool("debug", &value)?,
                _ => {}
            }
        }

        let output = match url.scheme() {
            "file" => Output::File(file_path(&url)?),
            "stderr" => Output::Stderr,
            "stdout" => Output::Stdout,
            "local-service" | "net" => {
                match url.host_str() {
                    Some(host) if !host.is_empty() => {
                        return Err(LogError::InvalidParameter {
                            name: "host",
                            value: host.to_string(),
                        })
                    }
                    _ => {}
                }
                Output::LocalService
            }
            "network" | "tcp" => Output::Network {
                transport: Transport::Tcp,
                addr: socket_addr(&url)?,
            },
            "tcp4" => Output::Network {
                transport: Transport::Tcp4,
                addr: socket_addr(&url)?,
            },
            "tcp6" => Output::Network {
                transport: Transport::Tcp6,
                addr: socket_addr(&url)?,
            },
            "udp" => Output::Network {
                transport: Transport::Udp,
                addr: socket_addr(&url)?,
            },
            "http" | "https" => Output::Http {
                endpoint: http_endpoint(&url),
                timeout: http_timeout(&url)?,
            },
            other => return Err(LogError::UnsupportedScheme(other.to_string())),
        };

        Ok(LoggerConfig {
            output,
            facility,
            tag,
            debug,
        })
    }

    /// The tag, or the executable name when the tag is empty.
    pub fn tag_or_default(&self) -> String {
        if !self.tag.is_empty() {
            return self.tag.clone();
        }
        std::env::current_exe()
            .ok()
            .and_then(|p| p.file_stem().map(|s| s.to_string_lossy().into_owned()))
            .unwrap_or_else(|| "netlog".to_string())
    }
}

fn parse_bool(name: &'static str, value: &str) -> Result<bool, LogError> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" | "" => Ok(false),
        _ => Err(LogError::InvalidParameter {
            name,
            value: value.to_string(),
        }),
    }
}

/// Request timeout for HTTP collectors, a positive number of seconds.
fn http_timeout(url: &Url) -> Result<Duration, LogError> {
    let value = match url.query_pairs().find(|(k, _)| k == "timeout") {
        Some((_, value)) => value,
        None => return Ok(Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECONDS)),
    };
    match value.parse::<u64>() {
        Ok(seconds) if seconds > 0 => Ok(Duration::from_secs(seconds)),
        _ => Err(LogError::InvalidParameter {
            name: "timeout",
            value: value.into_owned(),
        }),
    }
}

fn file_path(url: &Url) -> Result<PathBuf, LogError> {
    let unusable = |reason: &str| LogError::Io {
        path: PathBuf::from(url.path()),
        source: io::Error::new(io::ErrorKind::InvalidInput, reason.to_string()),
    };
    if url.path().is_empty() || url.path().ends_with('/') {
        return Err(unusable("file url does not name a file"));
    }
    url.to_file_path()
        .map_err(|_| unusable("file url is not a local absolute path"))
}

fn socket_addr(url: &Url) -> Result<String, LogError> {
    let host = match url.host_str() {
        Some(host) if !host.is_empty() => host,
        _ => {
            return Err(LogError::InvalidParameter {
                name: "host",
                value: String::new(),
            })
        }
    };
    let port = url.port().ok_or_else(|| LogError::InvalidParameter {
        name: "port",
        value: String::new(),
    })?;
    Ok(format!("{}:{}", host, port))
}

fn http_endpoint(url: &Url) -> Url {
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| !RESERVED_KEYS.contains(&&**k))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    let mut endpoint = url.clone();
    endpoint.set_query(None);
    if !kept.is_empty() {
        endpoint.query_pairs_mut().extend_pairs(kept);
    }
    endpoint
}

fn default_url() -> String {
    "stderr://".to_string()
}

/// Logging settings read from a TOML file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NetlogConfig {
    /// Output URL, as accepted by `set_output_url`.
    #[serde(default = "default_url")]
    pub url: String,

    #[serde(default)]
    pub debug: bool,
}

impl Default for NetlogConfig {
    fn default() -> Self {
        NetlogConfig {
            url: default_url(),
            debug: false,
        }
    }
}

/// Configuration wrapper to handle the [logging] section in TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ConfigWrapper {
    logging: NetlogConfig,
}

impl NetlogConfig {
    /// Reads the configuration from a TOML file.
    ///
    /// A missing file yields the defaults; a malformed one is an error.
    pub fn from_file(file_path: impl AsRef<Path>) -> Result<Self, LogError> {
        let file_path = file_path.as_ref();
        let config_str = match fs::read_to_string(file_path) {
            Ok(content) => content,
            Err(e) => {
                eprintln!(
                    "Warning: Could not read config file '{}': {}. Using defaults.",
                    file_path.display(),
                    e
                );
                return Ok(NetlogConfig::default());
            }
        };

        Self::from_toml(&config_str)
    }

    /// Parses either a `[logging]` table or bare top-level keys.
    pub fn from_toml(config_str: &str) -> Result<Self, LogError> {
        match toml::from_str::<ConfigWrapper>(config_str) {
            Ok(wrapper) => Ok(wrapper.logging),
            Err(e) => toml::from_str::<NetlogConfig>(config_str)
                .map_err(|_| LogError::Config(format!("Failed to parse config file: {}", e))),
        }
    }

    pub fn logger_config(&self) -> Result<LoggerConfig, LogError> {
        LoggerConfig::from_url(&self.url, self.debug)
    }
}
