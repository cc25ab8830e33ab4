/*
 * Syslog output
 *
 * Writes RFC 3164 style frames either to the local syslog socket or to a
 * remote receiver over TCP or UDP. Local frames omit the hostname, remote
 * frames carry an RFC 3339 timestamp and the hostname. A failed write is
 * retried once on a fresh connection.
 */

use chrono::{Local, SecondsFormat};
use std::io::{self, Write};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs, UdpSocket};
use std::sync::Mutex;

#[cfg(unix)]
use std::os::unix::net::{UnixDatagram, UnixStream};
#[cfg(unix)]
use std::path::PathBuf;

use crate::config::{Facility, Transport};
use crate::contracts::{LogOutput, Severity};
use crate::error::LogError;

#[cfg(unix)]
const LOCAL_SOCKETS: [&str; 3] = ["/dev/log", "/var/run/syslog", "/var/run/log"];

#[derive(Debug, Clone)]
enum Endpoint {
    #[cfg(unix)]
    Local(Vec<PathBuf>),
    Remote { transport: Transport, addr: String },
}

enum Connection {
    #[cfg(unix)]
    UnixDatagram(UnixDatagram),
    #[cfg(unix)]
    UnixStream(UnixStream),
    Tcp(TcpStream),
    Udp(UdpSocket),
}

impl Connection {
    fn send(&mut self, frame: &[u8]) -> io::Result<()> {
        match self {
            #[cfg(unix)]
            Connection::UnixDatagram(socket) => socket.send(frame).map(|_| ()),
            #[cfg(unix)]
            Connection::UnixStream(stream) => stream.write_all(frame),
            Connection::Tcp(stream) => stream.write_all(frame),
            Connection::Udp(socket) => socket.send(frame).map(|_| ()),
        }
    }
}

impl Endpoint {
    fn connect(&self) -> io::Result<Connection> {
        match self {
            #[cfg(unix)]
            Endpoint::Local(paths) => connect_local(paths),
            Endpoint::Remote { transport, addr } => connect_remote(*transport, addr),
        }
    }

    fn is_remote(&self) -> bool {
        matches!(self, Endpoint::Remote { .. })
    }
}

#[cfg(unix)]
fn connect_local(paths: &[PathBuf]) -> io::Result<Connection> {
    for path in paths {
        if let Ok(socket) = UnixDatagram::unbound() {
            if socket.connect(path).is_ok() {
                return Ok(Connection::UnixDatagram(socket));
            }
        }
        if let Ok(stream) = UnixStream::connect(path) {
            return Ok(Connection::UnixStream(stream));
        }
    }
    Err(io::Error::new(
        io::ErrorKind::NotFound,
        "no local syslog socket accepted a connection",
    ))
}

fn connect_remote(transport: Transport, addr: &str) -> io::Result<Connection> {
    let candidates: Vec<SocketAddr> = addr
        .to_socket_addrs()?
        .filter(|a| match transport {
            Transport::Tcp4 => a.is_ipv4(),
            Transport::Tcp6 => a.is_ipv6(),
            Transport::Tcp | Transport::Udp => true,
        })
        .collect();

    let mut last_err = io::Error::new(
        io::ErrorKind::AddrNotAvailable,
        format!("'{}' did not resolve to a usable address", addr),
    );

    for candidate in candidates {
        let attempt = match transport {
            Transport::Udp => {
                let bind: SocketAddr = if candidate.is_ipv4() {
                    ([0u8; 4], 0).into()
                } else {
                    ([0u16; 8], 0).into()
                };
                UdpSocket::bind(bind)
                    .and_then(|socket| socket.connect(candidate).map(|_| socket))
                    .map(Connection::Udp)
            }
            _ => TcpStream::connect(candidate).map(Connection::Tcp),
        };
        match attempt {
            Ok(connection) => return Ok(connection),
            Err(e) => last_err = e,
        }
    }
    Err(last_err)
}

/// Syslog writer for the local service or a remote receiver.
pub struct SyslogOutput {
    endpoint: Endpoint,
    facility: Facility,
    tag: String,
    hostname: String,
    pid: u32,
    connection: Mutex<Option<Connection>>,
}

impl SyslogOutput {
    /// Connects to the local syslog service.
    #[cfg(unix)]
    pub fn local(facility: Facility, tag: &str) -> Result<Self, LogError> {
        Self::local_at(LOCAL_SOCKETS.iter().map(PathBuf::from).collect(), facility, tag)
    }

    #[cfg(unix)]
    pub(crate) fn local_at(paths: Vec<PathBuf>, facility: Facility, tag: &str) -> Result<Self, LogError> {
        let endpoint = Endpoint::Local(paths);
        let connection = endpoint.connect().map_err(LogError::BackendUnavailable)?;
        Ok(Self::with_connection(endpoint, connection, facility, tag))
    }

    /// Connects to a remote receiver at `addr` (`host:port`).
    pub fn remote(transport: Transport, addr: &str, facility: Facility, tag: &str) -> Result<Self, LogError> {
        let endpoint = Endpoint::Remote {
            transport,
            addr: addr.to_string(),
        };
        let connection = endpoint.connect().map_err(|source| LogError::Connection {
            addr: addr.to_string(),
            source,
        })?;
        Ok(Self::with_connection(endpoint, connection, facility, tag))
    }

    fn with_connection(endpoint: Endpoint, connection: Connection, facility: Facility, tag: &str) -> Self {
        SyslogOutput {
            endpoint,
            facility,
            tag: tag.to_string(),
            hostname: hostname(),
            pid: std::process::id(),
            connection: Mutex::new(Some(connection)),
        }
    }

    pub fn facility(&self) -> Facility {
        self.facility
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    fn frame(&self, severity: Severity, message: &str) -> String {
        let priority = self.facility.syslog_code() | severity.syslog_code();
        if self.endpoint.is_remote() {
            let stamp = Local::now().to_rfc3339_opts(SecondsFormat::Secs, true);
            format_frame(priority, &stamp, Some(self.hostname.as_str()), &self.tag, self.pid, message)
        } else {
            let stamp = Local::now().format("%b %e %H:%M:%S").to_string();
            format_frame(priority, &stamp, None, &self.tag, self.pid, message)
        }
    }
}

pub(crate) fn format_frame(
    priority: u8,
    stamp: &str,
    hostname: Option<&str>,
    tag: &str,
    pid: u32,
    message: &str,
) -> String {
    let newline = if message.ends_with('\n') { "" } else { "\n" };
    match hostname {
        Some(host) => format!("<{}>{} {} {}[{}]: {}{}", priority, stamp, host, tag, pid, message, newline),
        None => format!("<{}>{} {}[{}]: {}{}", priority, stamp, tag, pid, message, newline),
    }
}

impl LogOutput for SyslogOutput {
    fn write_log(&self, severity: Severity, message: &str) -> io::Result<()> {
        let frame = self.frame(severity, message);

        let mut connection = match self.connection.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        if let Some(conn) = connection.as_mut() {
            if conn.send(frame.as_bytes()).is_ok() {
                return Ok(());
            }
        }

        // stale or missing connection: reconnect once and retry
        *connection = None;
        let mut fresh = self.endpoint.connect()?;
        fresh.send(frame.as_bytes())?;
        *connection = Some(fresh);
        Ok(())
    }
}

#[cfg(unix)]
fn hostname() -> String {
    let mut buf = [0u8; 256];
    let rc = unsafe { libc::gethostname(buf.as_mut_ptr() as *mut libc::c_char, buf.len()) };
    if rc != 0 {
        return "localhost".to_string();
    }
    let end = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
    match std::str::from_utf8(&buf[..end]) {
        Ok(name) if !name.is_empty() => name.to_string(),
        _ => "localhost".to_string(),
    }
}

#[cfg(not(unix))]
fn hostname() -> String {
    std::env::var("COMPUTERNAME").unwrap_or_else(|_| "localhost".to_string())
}
