//! Companion OpenVPN connection file of a profile

use super::{ProfileDescriptor, ProfileError};
use std::path::PathBuf;
use tracing::debug;

/// Extension of the connection definition file
pub const CONNECTION_EXTENSION: &str = "ovpn";

/// `<dir>/<id>.conf` -> `<dir>/<id>.ovpn`
pub fn connection_file_path(profile: &ProfileDescriptor) -> PathBuf {
    profile.source_path.with_extension(CONNECTION_EXTENSION)
}

/// Read the whole connection file. A profile without one is unusable.
pub fn read_connection_file(profile: &ProfileDescriptor) -> Result<String, ProfileError> {
    let path = connection_file_path(profile);
    let content = std::fs::read_to_string(&path).map_err(|e| ProfileError::io(&path, e))?;
    debug!("Read connection file {:?} ({} bytes)", path, content.len());
    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn profile_in(dir: &TempDir, id: &str) -> ProfileDescriptor {
        let path = dir.path().join(format!("{}.conf", id));
        ProfileDescriptor::parse(id, path, r#"{"name":"Test"}"#.to_string()).unwrap()
    }

    #[test]
    fn test_connection_file_path() {
        let profile =
            ProfileDescriptor::parse("office", "/profiles/office.conf", "{}".to_string()).unwrap();
        assert_eq!(
            connection_file_path(&profile),
            PathBuf::from("/profiles/office.ovpn")
        );
    }

    #[test]
    fn test_read_connection_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("office.ovpn"), "client\nauth-user-pass\n").unwrap();

        let content = read_connection_file(&profile_in(&dir, "office")).unwrap();
        assert_eq!(content, "client\nauth-user-pass\n");
    }

    #[test]
    fn test_missing_connection_file() {
        let dir = TempDir::new().unwrap();
        let result = read_connection_file(&profile_in(&dir, "office"));

        match result {
            Err(ProfileError::Io { path, .. }) => assert!(path.ends_with("office.ovpn")),
            other => panic!("expected Io error, got {:?}", other),
        }
    }
}
