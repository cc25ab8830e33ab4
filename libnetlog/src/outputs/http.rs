use chrono::Utc;
use reqwest::blocking::Client as BlockingClient;
use serde::{Deserialize, Serialize};
use std::io;
use std::time::Duration;
use url::Url;

use crate::config::Facility;
use crate::contracts::{LogOutput, Severity};
use crate::error::LogError;

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub(crate) struct LogPayload<'a> {
    pub timestamp: &'a str,
    pub level: &'a str,
    pub facility: &'a str,
    pub tag: &'a str,
    pub message: &'a str,
}

/// Posts each message as JSON to a log collector.
///
/// Uses a blocking client, so it must not be driven from inside an async
/// runtime worker.
pub struct HttpOutput {
    client: BlockingClient,
    endpoint: Url,
    facility: Facility,
    tag: String,
}

impl HttpOutput {
    pub fn new(endpoint: Url, timeout: Duration, facility: Facility, tag: &str) -> Result<Self, LogError> {
        let client = BlockingClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LogError::Connection {
                addr: endpoint.to_string(),
                source: io::Error::new(io::ErrorKind::Other, e),
            })?;

        Ok(HttpOutput {
            client,
            endpoint,
            facility,
            tag: tag.to_string(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl LogOutput for HttpOutput {
    fn write_log(&self, severity: Severity, message: &str) -> io::Result<()> {
        let timestamp = Utc::now().to_rfc3339();
        let payload = LogPayload {
            timestamp: &timestamp,
            level: severity.as_str(),
            facility: self.facility.as_str(),
            tag: &self.tag,
            message,
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&payload)
            .send()
            .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("Failed to send HTTP log: {}", e)))?;

        if !response.status().is_success() {
            return Err(io::Error::new(
                io::ErrorKind::Other,
                format!("HTTP log failed with status: {}", response.status()),
            ));
        }
        Ok(())
    }
}
