//! Local daemon HTTP API
//!
//! All endpoints live under the daemon base URL (`http://localhost:9770/`)
//! and exchange JSON:
//! - `GET status`: `{"status": true}`
//! - `GET ping`: empty body
//! - `GET profile`: map of profile id to [`ActiveConnection`]
//! - `POST profile`: connect, body is a `ConnectRequest`
//! - `DELETE profile`: disconnect, body is a `DisconnectRequest`
//! - `POST stop`: disconnect everything

use serde::Deserialize;

pub const ENDPOINT_STATUS: &str = "status";
pub const ENDPOINT_PING: &str = "ping";
pub const ENDPOINT_PROFILE: &str = "profile";
pub const ENDPOINT_STOP: &str = "stop";

/// Fixed `User-Agent` the daemon accepts
pub const USER_AGENT: &str = "pritunl";

/// Header carrying the daemon auth key
pub const AUTH_KEY_HEADER: &str = "Auth-Key";

/// State of a profile the daemon is managing
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ActiveConnection {
    pub status: String,
    /// Unix timestamp of the connection start
    pub timestamp: i64,
    pub server_addr: String,
    pub client_addr: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_active_connection_parse() {
        let json = r#"{
            "office": {
                "id": "office",
                "status": "connected",
                "timestamp": 1700000000,
                "server_addr": "vpn.example.com",
                "client_addr": "10.8.0.2"
            },
            "home": {"status": "connecting"}
        }"#;

        let conns: HashMap<String, ActiveConnection> = serde_json::from_str(json).unwrap();
        assert_eq!(conns["office"].status, "connected");
        assert_eq!(conns["office"].timestamp, 1_700_000_000);
        assert_eq!(conns["office"].client_addr, "10.8.0.2");
        assert_eq!(conns["home"].server_addr, "");
    }
}
