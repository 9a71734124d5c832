//! tunl - command-line client for the Pritunl desktop daemon
//!
//! Reads the profiles the Pritunl app keeps on disk, works out which
//! credentials each one needs and drives the local daemon's HTTP API.
//!
//! # Architecture
//!
//! - `config`: Client configuration file handling (TOML)
//! - `profile`: Profile descriptors and their `.ovpn` connection files
//! - `auth`: Auth mode resolution and interactive credential prompts
//! - `credentials`: Profile secrets from the OS keychain
//! - `payload`: Connect/disconnect request bodies
//! - `daemon`: HTTP client for the local daemon
//! - `session`: A full connect/disconnect attempt

pub mod auth;
pub mod config;
pub mod credentials;
pub mod daemon;
pub mod error;
pub mod payload;
pub mod profile;
pub mod session;

pub use auth::AuthMode;
pub use config::Config;
pub use credentials::{KeyringSecretStore, SecretStore};
pub use daemon::DaemonClient;
pub use error::TunlError;
pub use profile::{ProfileCatalog, ProfileDescriptor};
pub use session::Session;
