//! HTTP client for the daemon control API
//!
//! Requests are sent one at a time and never retried.

use super::protocol::{
    ActiveConnection, AUTH_KEY_HEADER, ENDPOINT_PING, ENDPOINT_PROFILE, ENDPOINT_STATUS,
    ENDPOINT_STOP, USER_AGENT,
};
use crate::payload::{ConnectRequest, DisconnectRequest};
use crate::profile::field_string;
use reqwest::{Client, Method, StatusCode};
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum DaemonError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Daemon returned HTTP {0}")]
    Status(u16),

    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Failed to read auth key {path}: {source}")]
    AuthKey {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Read the daemon auth key. A missing file means no key.
pub fn read_auth_key(path: &Path) -> Result<String, DaemonError> {
    if !path.exists() {
        warn!("Auth key file {:?} not found, using empty key", path);
        return Ok(String::new());
    }

    let key = std::fs::read_to_string(path).map_err(|source| DaemonError::AuthKey {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(key.trim().to_string())
}

/// Client for the local daemon
pub struct DaemonClient {
    client: Client,
    base_url: String,
    auth_key: String,
}

impl DaemonClient {
    pub fn new(
        base_url: impl Into<String>,
        auth_key: impl Into<String>,
    ) -> Result<Self, DaemonError> {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        // The daemon only listens on localhost
        let client = Client::builder().no_proxy().build()?;

        Ok(Self {
            client,
            base_url,
            auth_key: auth_key.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send a request and return the body of a 200 response
    ///
    /// Any other status is reported as [`DaemonError::Status`].
    pub async fn request(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<String>,
    ) -> Result<String, DaemonError> {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!("Sending {} {}", method, url);

        let mut request = self
            .client
            .request(method, &url)
            .header("User-Agent", USER_AGENT)
            .header("Content-Type", "application/json")
            .header(AUTH_KEY_HEADER, &self.auth_key);
        if let Some(body) = body {
            request = request.body(body);
        }

        let response = request.send().await?;
        let status = response.status();
        if status != StatusCode::OK {
            debug!("{} returned {}", url, status);
            return Err(DaemonError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        debug!("Response received ({} bytes)", body.len());
        Ok(body)
    }

    /// Value of the daemon's `status` field as text
    pub async fn status(&self) -> Result<String, DaemonError> {
        let body = self.request(Method::GET, ENDPOINT_STATUS, None).await?;
        let value: Value = serde_json::from_str(&body)?;
        Ok(value
            .as_object()
            .map(|doc| field_string(doc, "status"))
            .unwrap_or_default())
    }

    /// True when the daemon answers the ping with an empty body
    pub async fn ping(&self) -> Result<bool, DaemonError> {
        let body = self.request(Method::GET, ENDPOINT_PING, None).await?;
        Ok(body.is_empty())
    }

    /// Profiles the daemon currently manages, keyed by profile id
    pub async fn connections(&self) -> Result<HashMap<String, ActiveConnection>, DaemonError> {
        let body = self.request(Method::GET, ENDPOINT_PROFILE, None).await?;
        if body.trim().is_empty() {
            return Ok(HashMap::new());
        }
        let connections: Option<HashMap<String, ActiveConnection>> = serde_json::from_str(&body)?;
        Ok(connections.unwrap_or_default())
    }

    pub async fn connect(&self, request: &ConnectRequest) -> Result<(), DaemonError> {
        let body = serde_json::to_string(request)?;
        self.request(Method::POST, ENDPOINT_PROFILE, Some(body)).await?;
        Ok(())
    }

    pub async fn disconnect(&self, request: &DisconnectRequest) -> Result<(), DaemonError> {
        let body = serde_json::to_string(request)?;
        self.request(Method::DELETE, ENDPOINT_PROFILE, Some(body)).await?;
        Ok(())
    }

    /// Disconnect every profile
    pub async fn stop(&self) -> Result<(), DaemonError> {
        self.request(Method::POST, ENDPOINT_STOP, None).await?;
        Ok(())
    }
}
