//! HTTP transport to the swarm control plane.

use std::error::Error;
use std::fmt;
use std::sync::Arc;

use reqwest::blocking::Client;
use serde_json::Value;
use tracing::info;

use crate::config::ConsoleConfig;

/// Blocking request seam; implementations are shared across poll workers.
pub trait ConsoleTransport: Send + Sync {
    fn get(&self, path: &str) -> Result<String, TransportError>;

    fn post(&self, path: &str, body: Option<&Value>) -> Result<String, TransportError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    BuildClient { message: String },
    Http { message: String },
    HttpStatus { code: u16, message: String },
    Timeout { message: String },
    Offline,
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::BuildClient { message } => write!(f, "client build failed: {message}"),
            TransportError::Http { message } => write!(f, "http request failed: {message}"),
            TransportError::HttpStatus { code, message } => {
                write!(f, "http status {code}: {message}")
            }
            TransportError::Timeout { message } => write!(f, "request timed out: {message}"),
            TransportError::Offline => write!(f, "offline mode, network disabled"),
        }
    }
}

impl Error for TransportError {}

#[derive(Debug, Clone)]
pub struct HttpTransport {
    base_url: String,
    client: Client,
}

impl HttpTransport {
    pub fn from_config(config: &ConsoleConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|err| TransportError::BuildClient {
                message: err.to_string(),
            })?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn finish(response: reqwest::blocking::Response) -> Result<String, TransportError> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().unwrap_or_else(|_| "<no body>".to_string());
            return Err(TransportError::HttpStatus {
                code: status.as_u16(),
                message,
            });
        }
        response.text().map_err(map_reqwest_error)
    }
}

impl ConsoleTransport for HttpTransport {
    fn get(&self, path: &str) -> Result<String, TransportError> {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .map_err(map_reqwest_error)?;
        Self::finish(response)
    }

    fn post(&self, path: &str, body: Option<&Value>) -> Result<String, TransportError> {
        let request = self.client.post(self.url(path));
        let request = match body {
            Some(body) => request.json(body),
            None => request,
        };
        let response = request.send().map_err(map_reqwest_error)?;
        Self::finish(response)
    }
}

fn map_reqwest_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout {
            message: err.to_string(),
        }
    } else {
        TransportError::Http {
            message: err.to_string(),
        }
    }
}

/// Transport used when the console runs without a backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineTransport;

impl ConsoleTransport for OfflineTransport {
    fn get(&self, _path: &str) -> Result<String, TransportError> {
        Err(TransportError::Offline)
    }

    fn post(&self, _path: &str, _body: Option<&Value>) -> Result<String, TransportError> {
        Err(TransportError::Offline)
    }
}

/// Picks the offline or HTTP transport the config asks for.
pub fn transport_from_config(
    config: &ConsoleConfig,
) -> Result<Arc<dyn ConsoleTransport>, TransportError> {
    if config.offline {
        info!("offline mode, serving built-in samples");
        return Ok(Arc::new(OfflineTransport));
    }
    info!("polling {} every {:?}", config.base_url, config.poll_interval());
    Ok(Arc::new(HttpTransport::from_config(config)?))
}
