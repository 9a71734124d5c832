//! One connect or disconnect attempt against the daemon
//!
//! Steps run strictly in order and the first failure aborts the attempt:
//! 1. reload the profile catalog and select the profile
//! 2. read the `.ovpn` file and resolve the auth mode
//! 3. fetch the profile secret from the keychain
//! 4. prompt for whatever credentials are still missing
//! 5. send the connect request

use crate::auth::{self, assemble_credentials, Prompter};
use crate::credentials::{profile_secret, SecretStore};
use crate::daemon::DaemonClient;
use crate::error::TunlError;
use crate::payload::{build_connect, build_disconnect, ConnectionMaterial};
use crate::profile::{read_connection_file, ProfileCatalog, ProfileError};
use std::path::PathBuf;
use tracing::{debug, info};

/// A selected profile with its connection material
#[derive(Debug, Clone)]
pub struct PreparedProfile {
    pub identifier: String,
    pub display_name: String,
    pub material: ConnectionMaterial,
}

pub struct Session<S> {
    profiles_dir: PathBuf,
    daemon: DaemonClient,
    secrets: S,
}

impl<S: SecretStore> Session<S> {
    pub fn new(profiles_dir: impl Into<PathBuf>, daemon: DaemonClient, secrets: S) -> Self {
        Self {
            profiles_dir: profiles_dir.into(),
            daemon,
            secrets,
        }
    }

    pub fn daemon(&self) -> &DaemonClient {
        &self.daemon
    }

    /// Fresh snapshot of the profiles directory
    pub fn catalog(&self) -> Result<ProfileCatalog, ProfileError> {
        ProfileCatalog::load(&self.profiles_dir)
    }

    /// Collect everything a connect needs except interactive credentials
    pub fn prepare(&self, selector: &str) -> Result<PreparedProfile, TunlError> {
        let catalog = self.catalog()?;
        let profile = catalog.select(selector)?;

        let connection_text = read_connection_file(profile)?;
        let mode = auth::resolve(profile, &connection_text);
        debug!("Profile {} uses auth mode {}", profile.identifier, mode);

        let secret = profile_secret(&self.secrets, &profile.identifier)?;

        Ok(PreparedProfile {
            identifier: profile.identifier.clone(),
            display_name: profile.display_name.clone(),
            material: ConnectionMaterial {
                connection_text,
                secret,
                mode,
            },
        })
    }

    /// Connect a profile, prompting through `prompter` when needed
    ///
    /// Returns the connected profile's identifier and display name.
    pub async fn connect<P: Prompter + ?Sized>(
        &self,
        selector: &str,
        user: &str,
        password: &str,
        prompter: &mut P,
    ) -> Result<PreparedProfile, TunlError> {
        let prepared = self.prepare(selector)?;
        info!("Connecting to {}...", prepared.display_name);

        let credentials = assemble_credentials(&prepared.material.mode, user, password, prompter)?;
        let request = build_connect(&prepared.identifier, &prepared.material, &credentials);
        self.daemon.connect(&request).await?;

        Ok(prepared)
    }

    /// Disconnect a profile, returning its identifier
    pub async fn disconnect(&self, selector: &str) -> Result<String, TunlError> {
        let catalog = self.catalog()?;
        let identifier = catalog.select(selector)?.identifier.clone();

        info!("Disconnecting {}...", identifier);
        self.daemon.disconnect(&build_disconnect(&identifier)).await?;
        Ok(identifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::prompt::tests::ScriptedPrompter;
    use crate::auth::AuthMode;
    use crate::credentials::tests::MemorySecretStore;
    use crate::credentials::CredentialError;
    use crate::daemon::DaemonError;
    use serde_json::json;
    use tempfile::TempDir;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn profiles(descriptor: &str, connection: &str) -> TempDir {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("office.conf"), descriptor).unwrap();
        std::fs::write(dir.path().join("office.ovpn"), connection).unwrap();
        dir
    }

    fn offline_session(dir: &TempDir) -> Session<MemorySecretStore> {
        let daemon = DaemonClient::new("http://127.0.0.1:9/", "").unwrap();
        Session::new(
            dir.path(),
            daemon,
            MemorySecretStore::with("office", "<tls-crypt>k</tls-crypt>"),
        )
    }

    #[test]
    fn test_prepare_credentials_profile() {
        let dir = profiles(
            r#"{"user":"alice","server":"vpn.example.com"}"#,
            "client\nauth-user-pass\nremote vpn.example.com 1194\n",
        );
        let session = offline_session(&dir);

        let prepared = session.prepare("office").unwrap();
        assert_eq!(prepared.display_name, "alice (vpn.example.com)");
        assert_eq!(prepared.material.mode, AuthMode::Credentials);
        assert_eq!(
            prepared.material.data(),
            "client\nauth-user-pass\nremote vpn.example.com 1194\n\n<tls-crypt>k</tls-crypt>"
        );
    }

    #[test]
    fn test_prepare_password_pin_profile() {
        let dir = profiles(
            r#"{"user":"alice","server":"vpn.example.com","password_mode":"password_pin"}"#,
            "client\nauth-user-pass\n",
        );
        let session = offline_session(&dir);

        let prepared = session.prepare("office").unwrap();
        assert_eq!(prepared.material.mode, AuthMode::PasswordPin);

        let mut prompter = ScriptedPrompter::new(&["2468"]);
        let creds = assemble_credentials(&prepared.material.mode, "", "", &mut prompter).unwrap();
        assert_eq!(creds.username, "pritunl");
        assert_eq!(prompter.masked, vec!["Enter the PIN"]);
        assert!(prompter.visible.is_empty());
    }

    #[test]
    fn test_prepare_unknown_profile() {
        let dir = profiles(r#"{"name":"Office"}"#, "client\n");
        let session = offline_session(&dir);

        let result = session.prepare("home");
        assert!(matches!(
            result,
            Err(TunlError::Profile(ProfileError::NotFound(_)))
        ));
    }

    #[test]
    fn test_prepare_missing_connection_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("office.conf"), r#"{"name":"Office"}"#).unwrap();
        let session = offline_session(&dir);

        let result = session.prepare("office");
        assert!(matches!(
            result,
            Err(TunlError::Profile(ProfileError::Io { .. }))
        ));
    }

    #[test]
    fn test_prepare_missing_secret() {
        let dir = profiles(r#"{"name":"Office"}"#, "client\n");
        let daemon = DaemonClient::new("http://127.0.0.1:9/", "").unwrap();
        let session = Session::new(dir.path(), daemon, MemorySecretStore::default());

        let result = session.prepare("office");
        assert!(matches!(
            result,
            Err(TunlError::Credential(CredentialError::NotFound(_)))
        ));
    }

    #[tokio::test]
    async fn test_connect_otp_pin() {
        let dir = profiles(
            r#"{"name":"Office","password_mode":"otp_pin"}"#,
            "client\nauth-user-pass\n",
        );
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/profile"))
            .and(header("Auth-Key", "key"))
            .and(body_json(json!({
                "id": "office",
                "reconnect": true,
                "timeout": true,
                "username": "pritunl",
                "password": "1234000111",
                "data": "client\nauth-user-pass\n\nsecret"
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let session = Session::new(
            dir.path(),
            DaemonClient::new(server.uri(), "key").unwrap(),
            MemorySecretStore::with("office", "secret"),
        );

        let mut prompter = ScriptedPrompter::new(&["1234", "000111"]);
        let prepared = session.connect("office", "alice", "", &mut prompter).await.unwrap();
        assert_eq!(prepared.display_name, "Office");
    }

    #[tokio::test]
    async fn test_connect_without_auth_omits_credentials() {
        let dir = profiles(r#"{"name":"Office"}"#, "client\nremote x 1194\n");
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/profile"))
            .and(body_json(json!({
                "id": "office",
                "reconnect": true,
                "timeout": true,
                "data": "client\nremote x 1194\n\nsecret"
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let session = Session::new(
            dir.path(),
            DaemonClient::new(server.uri(), "").unwrap(),
            MemorySecretStore::with("office", "secret"),
        );

        let mut prompter = ScriptedPrompter::new(&[]);
        session.connect("1", "alice", "pw", &mut prompter).await.unwrap();
        assert!(prompter.masked.is_empty());
    }

    #[tokio::test]
    async fn test_connect_rejected_by_daemon() {
        let dir = profiles(r#"{"name":"Office"}"#, "client\n");
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/profile"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let session = Session::new(
            dir.path(),
            DaemonClient::new(server.uri(), "").unwrap(),
            MemorySecretStore::with("office", "secret"),
        );

        let mut prompter = ScriptedPrompter::new(&[]);
        let result = session.connect("office", "", "", &mut prompter).await;
        assert!(matches!(
            result,
            Err(TunlError::Daemon(DaemonError::Status(500)))
        ));
    }

    #[tokio::test]
    async fn test_disconnect() {
        let dir = profiles(r#"{"name":"Office"}"#, "client\n");
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/profile"))
            .and(body_json(json!({"id": "office"})))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let session = Session::new(
            dir.path(),
            DaemonClient::new(server.uri(), "").unwrap(),
            MemorySecretStore::default(),
        );

        assert_eq!(session.disconnect("office").await.unwrap(), "office");
    }
}
