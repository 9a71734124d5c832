//! Profile secrets from the OS-native keychain
//!
//! The Pritunl app stores one generic password per profile (service
//! `pritunl`, account = profile identifier). Its value is base64 and decodes
//! to extra connection material that is appended to the `.ovpn` contents.

use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use keyring::Entry;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("No keychain entry for profile: {0}")]
    NotFound(String),
    #[error("Keychain lookup failed: {0}")]
    Keyring(#[from] keyring::Error),
    #[error("Keychain entry is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("Decoded keychain entry is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Secret lookup capability, keyed by profile identifier
pub trait SecretStore {
    /// Raw (still base64 encoded) secret for a profile
    fn get_secret(&self, profile_id: &str) -> Result<String, CredentialError>;
}

/// Secret store backed by Keychain, Credential Manager or Secret Service
pub struct KeyringSecretStore {
    service: String,
}

impl KeyringSecretStore {
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }
}

impl SecretStore for KeyringSecretStore {
    fn get_secret(&self, profile_id: &str) -> Result<String, CredentialError> {
        debug!("Looking up keychain entry {}/{}", self.service, profile_id);

        let entry = Entry::new(&self.service, profile_id)?;
        match entry.get_password() {
            Ok(secret) => {
                debug!("Retrieved keychain entry for profile: {}", profile_id);
                Ok(secret)
            }
            Err(keyring::Error::NoEntry) => Err(CredentialError::NotFound(profile_id.to_string())),
            Err(e) => Err(e.into()),
        }
    }
}

/// Decode a keychain blob. Surrounding whitespace (trailing newline from
/// command-line tools) is ignored.
pub fn decode_secret(blob: &str) -> Result<String, CredentialError> {
    let bytes = BASE64.decode(blob.trim())?;
    Ok(String::from_utf8(bytes)?)
}

/// Fetch and decode the secret of a profile
pub fn profile_secret<S: SecretStore + ?Sized>(
    store: &S,
    profile_id: &str,
) -> Result<String, CredentialError> {
    let secret = decode_secret(&store.get_secret(profile_id)?)?;
    debug!("Decoded profile secret ({} bytes)", secret.len());
    Ok(secret)
}
