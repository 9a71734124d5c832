//! Interactive credential acquisition
//!
//! The keychain is never touched here: the caller fetches the profile
//! secret first and only then asks the user for what is still missing.

use super::AuthMode;
use std::fmt;
use std::io::Write;
use thiserror::Error;
use tracing::debug;

/// Username the daemon expects for PIN based modes
pub const PIN_USERNAME: &str = "pritunl";

#[derive(Error, Debug)]
pub enum PromptError {
    #[error("Failed to read input: {0}")]
    Io(#[from] std::io::Error),
    #[error("OTP code must be numeric")]
    InvalidOtp,
    #[error("PIN must not be empty")]
    EmptyPin,
}

/// Terminal input capability
pub trait Prompter {
    /// Read a line with echo
    fn prompt_visible(&mut self, label: &str) -> Result<String, PromptError>;
    /// Read a line without echo
    fn prompt_masked(&mut self, label: &str) -> Result<String, PromptError>;
}

/// Prompts on the controlling terminal
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn prompt_visible(&mut self, label: &str) -> Result<String, PromptError> {
        print!("{}: ", label);
        std::io::stdout().flush()?;

        let mut input = String::new();
        std::io::stdin().read_line(&mut input)?;
        Ok(input.trim().to_string())
    }

    fn prompt_masked(&mut self, label: &str) -> Result<String, PromptError> {
        Ok(rpassword::prompt_password(format!("{}: ", label))?)
    }
}

/// Username/password pair sent to the daemon
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Gather the credentials `mode` needs, prompting only for what was not
/// supplied
///
/// PIN modes always use [`PIN_USERNAME`]. A non-empty `password` skips the
/// PIN (and OTP) prompts entirely and is sent as-is.
pub fn assemble_credentials<P: Prompter + ?Sized>(
    mode: &AuthMode,
    user: &str,
    password: &str,
    prompter: &mut P,
) -> Result<Credentials, PromptError> {
    if !mode.requires_credentials() {
        return Ok(Credentials::default());
    }

    if mode.uses_pin() {
        let password = if password.is_empty() {
            let pin = prompter.prompt_masked("Enter the PIN")?;
            if pin.is_empty() {
                return Err(PromptError::EmptyPin);
            }
            if *mode == AuthMode::OtpPin {
                let otp = prompter.prompt_visible("Enter the OTP code")?;
                format!("{}{}", pin, validate_otp(&otp)?)
            } else {
                pin
            }
        } else {
            debug!("Using supplied password for {} profile", mode);
            password.to_string()
        };

        return Ok(Credentials {
            username: PIN_USERNAME.to_string(),
            password,
        });
    }

    let username = if user.is_empty() {
        prompter.prompt_visible("Enter the username")?
    } else {
        user.to_string()
    };
    let password = if password.is_empty() {
        prompter.prompt_masked("Enter the password")?
    } else {
        password.to_string()
    };

    Ok(Credentials { username, password })
}

fn validate_otp(otp: &str) -> Result<&str, PromptError> {
    let otp = otp.trim();
    if otp.is_empty() || !otp.chars().all(|c| c.is_ascii_digit()) {
        return Err(PromptError::InvalidOtp);
    }
    Ok(otp)
}
