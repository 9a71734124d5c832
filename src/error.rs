//! Crate-level error

use crate::auth::PromptError;
use crate::config::ConfigError;
use crate::credentials::CredentialError;
use crate::daemon::DaemonError;
use crate::profile::ProfileError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TunlError {
    #[error(transparent)]
    Profile(#[from] ProfileError),
    #[error(transparent)]
    Credential(#[from] CredentialError),
    #[error(transparent)]
    Prompt(#[from] PromptError),
    #[error(transparent)]
    Daemon(#[from] DaemonError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}
