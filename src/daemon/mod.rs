//! Client for the local Pritunl daemon
//!
//! # Usage
//!
//! ```ignore
//! use tunl::daemon::DaemonClient;
//!
//! let client = DaemonClient::new("http://localhost:9770/", auth_key)?;
//!
//! if client.ping().await? {
//!     println!("Daemon status: {}", client.status().await?);
//! }
//!
//! // Disconnect every profile
//! client.stop().await?;
//! ```

pub mod client;
pub mod protocol;

pub use client::{read_auth_key, DaemonClient, DaemonError};
pub use protocol::ActiveConnection;
