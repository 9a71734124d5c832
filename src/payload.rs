//! Request bodies for the daemon `profile` endpoint

use crate::auth::{AuthMode, Credentials};
use serde::Serialize;

/// Everything needed to connect one profile, gathered for a single attempt
#[derive(Debug, Clone)]
pub struct ConnectionMaterial {
    /// Contents of the `.ovpn` file
    pub connection_text: String,
    /// Decoded keychain secret
    pub secret: String,
    pub mode: AuthMode,
}

impl ConnectionMaterial {
    /// Connection text with the secret appended on its own line
    pub fn data(&self) -> String {
        format!("{}\n{}", self.connection_text, self.secret)
    }
}

/// `POST profile` body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectRequest {
    pub id: String,
    pub reconnect: bool,
    pub timeout: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub data: String,
}

/// `DELETE profile` body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisconnectRequest {
    pub id: String,
}

/// Build the connect body. Credentials are only included when the
/// material's auth mode requires them.
pub fn build_connect(
    id: &str,
    material: &ConnectionMaterial,
    credentials: &Credentials,
) -> ConnectRequest {
    let (username, password) = if material.mode.requires_credentials() {
        (
            Some(credentials.username.clone()),
            Some(credentials.password.clone()),
        )
    } else {
        (None, None)
    };

    ConnectRequest {
        id: id.to_string(),
        reconnect: true,
        timeout: true,
        username,
        password,
        data: material.data(),
    }
}

pub fn build_disconnect(id: &str) -> DisconnectRequest {
    DisconnectRequest { id: id.to_string() }
}
