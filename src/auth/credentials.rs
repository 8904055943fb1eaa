//! Credential resolution
//!
//! A FlashArray session can be opened with either a password or a
//! pre-issued API token; vCenter always takes a password. Whichever
//! secret is missing at connect time is requested interactively so
//! plaintext credentials never have to appear in scripts or shell
//! history.

use crate::config::ConnectionConfig;
use crate::error::{Error, Result};

/// Prompt text for the array password
pub const ARRAY_PASSWORD_PROMPT: &str = "FlashArray Password: ";
/// Prompt text for the vCenter password
pub const VSPHERE_PASSWORD_PROMPT: &str = "vSphere Password: ";

// ============================================================================
// Array Credential
// ============================================================================

/// Credential used to authenticate against the FlashArray
#[derive(Clone, PartialEq, Eq)]
pub enum ArrayCredential {
    /// Username/password pair (the username lives in the config)
    Password(String),
    /// Pre-issued API token
    ApiToken(String),
}

// Secrets stay out of Debug output.
impl std::fmt::Debug for ArrayCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArrayCredential::Password(_) => f.write_str("Password(***)"),
            ArrayCredential::ApiToken(_) => f.write_str("ApiToken(***)"),
        }
    }
}

/// Fully resolved secrets for both back ends
#[derive(Clone)]
pub struct ResolvedCredentials {
    /// Array-side credential
    pub array: ArrayCredential,
    /// vCenter password
    pub vcenter_password: String,
}

impl std::fmt::Debug for ResolvedCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedCredentials")
            .field("array", &self.array)
            .field("vcenter_password", &"***")
            .finish()
    }
}

// ============================================================================
// Secret Prompt
// ============================================================================

/// Source of interactively entered secrets
pub trait SecretPrompt {
    /// Read one secret, blocking until the user answers
    fn read_secret(&self, prompt: &str) -> Result<String>;
}

/// Production prompt reading from the controlling terminal without echo
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalPrompt;

impl SecretPrompt for TerminalPrompt {
    fn read_secret(&self, prompt: &str) -> Result<String> {
        rpassword::prompt_password(prompt).map_err(|e| Error::Prompt {
            message: e.to_string(),
        })
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the secrets in `config`, prompting for whatever is missing
///
/// An API token short-circuits the array prompt entirely; a token and a
/// password together have already been rejected by
/// [`ConnectionConfig::validate`].
pub fn resolve(
    config: &ConnectionConfig,
    prompt: &dyn SecretPrompt,
) -> Result<ResolvedCredentials> {
    let array = if let Some(token) = &config.array_token {
        ArrayCredential::ApiToken(token.clone())
    } else if let Some(password) = &config.array_password {
        ArrayCredential::Password(password.clone())
    } else {
        ArrayCredential::Password(prompt.read_secret(ARRAY_PASSWORD_PROMPT)?)
    };

    let vcenter_password = match &config.vcenter_password {
        Some(password) => password.clone(),
        None => prompt.read_secret(VSPHERE_PASSWORD_PROMPT)?,
    };

    Ok(ResolvedCredentials {
        array,
        vcenter_password,
    })
}
