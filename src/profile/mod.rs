//! Profiles stored by the Pritunl desktop app
//!
//! Every profile is a pair of files sharing a basename in the profiles
//! directory:
//! - `<id>.conf`: JSON descriptor (`name`, `user`, `server`, `password_mode`, ...)
//! - `<id>.ovpn`: OpenVPN connection definition
//!
//! A [`ProfileCatalog`] is a snapshot of the directory. It is rebuilt from
//! scratch on every [`ProfileCatalog::load`] and never updated in place.

pub mod connection;

pub use connection::{connection_file_path, read_connection_file};

use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Extension of profile descriptor files
pub const DESCRIPTOR_EXTENSION: &str = "conf";

#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid profile descriptor {path}: {reason}")]
    Parse { path: PathBuf, reason: String },
    #[error("Profile not found: {0}")]
    NotFound(String),
}

impl ProfileError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// One on-disk profile descriptor
#[derive(Debug, Clone)]
pub struct ProfileDescriptor {
    /// Descriptor basename without extension
    pub identifier: String,
    pub source_path: PathBuf,
    /// Name shown to the user, synthesized as `user (server)` when unset
    pub display_name: String,
    raw_content: String,
    document: Map<String, Value>,
}

impl ProfileDescriptor {
    /// Parse a descriptor document
    ///
    /// When `name` is absent or empty the synthesized display name is
    /// written back into the document, so [`raw_content`](Self::raw_content)
    /// always carries a name.
    pub fn parse(
        identifier: impl Into<String>,
        source_path: impl Into<PathBuf>,
        content: String,
    ) -> Result<Self, ProfileError> {
        let source_path = source_path.into();

        let value: Value = serde_json::from_str(&content).map_err(|e| ProfileError::Parse {
            path: source_path.clone(),
            reason: e.to_string(),
        })?;
        let Value::Object(mut document) = value else {
            return Err(ProfileError::Parse {
                path: source_path,
                reason: "expected a JSON object".to_string(),
            });
        };

        let name = field_string(&document, "name");
        let (display_name, raw_content) = if name.is_empty() {
            let display_name = format!(
                "{} ({})",
                field_string(&document, "user"),
                field_string(&document, "server")
            );
            document.insert("name".to_string(), Value::String(display_name.clone()));
            let raw_content =
                serde_json::to_string(&document).map_err(|e| ProfileError::Parse {
                    path: source_path.clone(),
                    reason: e.to_string(),
                })?;
            (display_name, raw_content)
        } else {
            (name, content)
        };

        Ok(Self {
            identifier: identifier.into(),
            source_path,
            display_name,
            raw_content,
            document,
        })
    }

    /// Full descriptor text, including a synthesized `name` if one was needed
    pub fn raw_content(&self) -> &str {
        &self.raw_content
    }

    /// String value of a top-level descriptor field, empty when absent or null
    pub fn field(&self, key: &str) -> String {
        field_string(&self.document, key)
    }

    pub fn user(&self) -> String {
        self.field("user")
    }

    pub fn server(&self) -> String {
        self.field("server")
    }

    /// Requested flavour of interactive auth (`password`, `password_pin`, `otp_pin`)
    pub fn password_mode(&self) -> String {
        self.field("password_mode")
    }
}

/// Render a JSON field as a string: strings verbatim, null/missing as
/// empty, anything else as its JSON text
pub(crate) fn field_string(document: &Map<String, Value>, key: &str) -> String {
    match document.get(key) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Snapshot of all profiles in a directory, keyed by identifier
#[derive(Debug, Clone, Default)]
pub struct ProfileCatalog {
    profiles: HashMap<String, ProfileDescriptor>,
}

impl ProfileCatalog {
    /// Scan `directory` (non-recursively) for `*.conf` descriptors
    ///
    /// Any unreadable or malformed descriptor fails the whole load.
    pub fn load(directory: &Path) -> Result<Self, ProfileError> {
        debug!("Loading profiles from {:?}", directory);

        let entries = fs::read_dir(directory).map_err(|e| ProfileError::io(directory, e))?;

        let mut profiles = HashMap::new();
        for entry in entries {
            let path = entry.map_err(|e| ProfileError::io(directory, e))?.path();

            if path.extension().and_then(|e| e.to_str()) != Some(DESCRIPTOR_EXTENSION) {
                continue;
            }
            let Some(identifier) = path.file_stem().map(|s| s.to_string_lossy().into_owned())
            else {
                continue;
            };

            let bytes = fs::read(&path).map_err(|e| ProfileError::io(&path, e))?;
            let content = String::from_utf8(bytes).map_err(|e| ProfileError::Parse {
                path: path.clone(),
                reason: e.to_string(),
            })?;
            let descriptor = ProfileDescriptor::parse(identifier.clone(), path, content)?;
            debug!("Loaded profile {} ({})", identifier, descriptor.display_name);
            profiles.insert(identifier, descriptor);
        }

        debug!("Loaded {} profile(s)", profiles.len());
        Ok(Self { profiles })
    }

    pub fn get(&self, identifier: &str) -> Option<&ProfileDescriptor> {
        self.profiles.get(identifier)
    }

    /// Look up a profile by identifier, or by its 1-based position in
    /// [`entries`](Self::entries)
    pub fn select(&self, selector: &str) -> Result<&ProfileDescriptor, ProfileError> {
        if let Some(profile) = self.profiles.get(selector) {
            return Ok(profile);
        }

        selector
            .parse::<usize>()
            .ok()
            .and_then(|index| index.checked_sub(1))
            .and_then(|index| self.entries().into_iter().nth(index))
            .map(|(_, profile)| profile)
            .ok_or_else(|| ProfileError::NotFound(selector.to_string()))
    }

    /// Profiles sorted by identifier, paired with their 1-based position
    pub fn entries(&self) -> Vec<(usize, &ProfileDescriptor)> {
        let mut profiles: Vec<_> = self.profiles.values().collect();
        profiles.sort_by(|a, b| a.identifier.cmp(&b.identifier));
        profiles
            .into_iter()
            .enumerate()
            .map(|(i, p)| (i + 1, p))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}
