//! Authentication mode negotiation
//!
//! The connection file decides whether interactive auth is needed at all:
//! a bare `auth-user-pass` line means the daemon expects credentials. The
//! descriptor's `password_mode` only refines which kind.

pub mod prompt;

pub use prompt::{assemble_credentials, Credentials, PromptError, Prompter, TerminalPrompter};

use crate::profile::ProfileDescriptor;
use std::fmt;

/// Connection file directive requesting username/password auth
pub const AUTH_MARKER: &str = "auth-user-pass";

/// Longest line still counted as a bare marker. Anything longer is assumed
/// to carry an inline credentials file argument.
const MAX_MARKER_LINE_LEN: usize = 17;

/// Kind of interactive credential flow a profile needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthMode {
    None,
    /// Plain username and password
    Credentials,
    /// Fixed username, PIN as password
    PasswordPin,
    /// Fixed username, PIN followed by an OTP code as password
    OtpPin,
    /// Unrecognized `password_mode`, carried verbatim
    Other(String),
}

impl AuthMode {
    /// Map a descriptor `password_mode` value
    pub fn from_password_mode(value: &str) -> Self {
        match value {
            "" | "password" => AuthMode::Credentials,
            "password_pin" => AuthMode::PasswordPin,
            "otp_pin" => AuthMode::OtpPin,
            other => AuthMode::Other(other.to_string()),
        }
    }

    pub fn requires_credentials(&self) -> bool {
        !matches!(self, AuthMode::None)
    }

    /// PIN based modes authenticate with a fixed username
    pub fn uses_pin(&self) -> bool {
        match self {
            AuthMode::PasswordPin | AuthMode::OtpPin => true,
            AuthMode::Other(mode) => mode.ends_with("pin"),
            AuthMode::None | AuthMode::Credentials => false,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            AuthMode::None => "none",
            AuthMode::Credentials => "credentials",
            AuthMode::PasswordPin => "password_pin",
            AuthMode::OtpPin => "otp_pin",
            AuthMode::Other(mode) => mode,
        }
    }
}

impl fmt::Display for AuthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether the connection file has a bare `auth-user-pass` line
pub fn requires_interactive_auth(connection_text: &str) -> bool {
    connection_text
        .split('\n')
        .any(|line| line.contains(AUTH_MARKER) && line.len() <= MAX_MARKER_LINE_LEN)
}

/// Decide the auth mode for one connection attempt
pub fn resolve(descriptor: &ProfileDescriptor, connection_text: &str) -> AuthMode {
    if !requires_interactive_auth(connection_text) {
        return AuthMode::None;
    }

    AuthMode::from_password_mode(&descriptor.password_mode())
}
