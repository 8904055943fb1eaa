//! Connection configuration
//!
//! Holds the connection parameters for the two back ends (FlashArray,
//! vCenter) plus the TLS-verification switch. Non-secret fields can be
//! loaded from a YAML profile file; secrets come from explicit fields,
//! environment variables, or an interactive prompt at connect time.

use crate::error::{Error, Result};
use crate::types::OptionStringExt;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable consulted for the array password
pub const ENV_ARRAY_PASSWORD: &str = "PURELINK_ARRAY_PASSWORD";
/// Environment variable consulted for the array API token
pub const ENV_ARRAY_TOKEN: &str = "PURELINK_ARRAY_TOKEN";
/// Environment variable consulted for the vCenter password
pub const ENV_VCENTER_PASSWORD: &str = "PURELINK_VCENTER_PASSWORD";

// ============================================================================
// Connection Config
// ============================================================================

/// Connection parameters for a FlashArray and a vCenter Server
#[derive(Clone)]
pub struct ConnectionConfig {
    /// FlashArray IP address or FQDN
    pub array_host: String,
    /// Authenticated user for the FlashArray
    pub array_user: String,
    /// Password for the FlashArray user
    pub array_password: Option<String>,
    /// Pre-issued API token for the FlashArray (alternative to the password)
    pub array_token: Option<String>,
    /// vCenter Server IP address or FQDN
    pub vcenter_host: String,
    /// Authenticated user for vCenter Server
    pub vcenter_user: String,
    /// Password for the vCenter user
    pub vcenter_password: Option<String>,
    /// Whether outbound TLS connections verify the server certificate
    pub verify_tls: bool,
    /// Explicit array base URL; defaults to `https://{array_host}`
    pub array_url: Option<String>,
    /// Explicit vCenter base URL; defaults to `https://{vcenter_host}`
    pub vcenter_url: Option<String>,
}

impl ConnectionConfig {
    /// Create a config with the required (non-secret) fields
    pub fn new(
        array_host: impl Into<String>,
        array_user: impl Into<String>,
        vcenter_host: impl Into<String>,
        vcenter_user: impl Into<String>,
    ) -> Self {
        Self {
            array_host: array_host.into(),
            array_user: array_user.into(),
            array_password: None,
            array_token: None,
            vcenter_host: vcenter_host.into(),
            vcenter_user: vcenter_user.into(),
            vcenter_password: None,
            verify_tls: true,
            array_url: None,
            vcenter_url: None,
        }
    }

    /// Build a config from a loaded profile
    pub fn from_profile(profile: &Profile) -> Self {
        let mut config = Self::new(
            profile.array.host.clone(),
            profile.array.user.clone(),
            profile.vcenter.host.clone(),
            profile.vcenter.user.clone(),
        );
        config.verify_tls = profile.verify_tls;
        config
    }

    /// Set the array password
    #[must_use]
    pub fn array_password(mut self, password: impl Into<String>) -> Self {
        self.array_password = Some(password.into());
        self
    }

    /// Set the array API token
    #[must_use]
    pub fn array_token(mut self, token: impl Into<String>) -> Self {
        self.array_token = Some(token.into());
        self
    }

    /// Set the vCenter password
    #[must_use]
    pub fn vcenter_password(mut self, password: impl Into<String>) -> Self {
        self.vcenter_password = Some(password.into());
        self
    }

    /// Disable TLS certificate verification for both back ends
    #[must_use]
    pub fn no_verify_tls(mut self) -> Self {
        self.verify_tls = false;
        self
    }

    /// Override the array base URL (e.g. a non-standard port)
    #[must_use]
    pub fn array_url(mut self, url: impl Into<String>) -> Self {
        self.array_url = Some(url.into());
        self
    }

    /// Override the vCenter base URL (e.g. a non-standard port)
    #[must_use]
    pub fn vcenter_url(mut self, url: impl Into<String>) -> Self {
        self.vcenter_url = Some(url.into());
        self
    }

    /// Effective array base URL
    pub fn effective_array_url(&self) -> String {
        self.array_url
            .clone()
            .unwrap_or_else(|| format!("https://{}", self.array_host))
    }

    /// Effective vCenter base URL
    pub fn effective_vcenter_url(&self) -> String {
        self.vcenter_url
            .clone()
            .unwrap_or_else(|| format!("https://{}", self.vcenter_host))
    }

    /// Fill missing secrets from the environment
    pub fn secrets_from_env(&mut self) {
        if self.array_password.is_none() {
            self.array_password = std::env::var(ENV_ARRAY_PASSWORD).ok().none_if_empty();
        }
        if self.array_token.is_none() {
            self.array_token = std::env::var(ENV_ARRAY_TOKEN).ok().none_if_empty();
        }
        if self.vcenter_password.is_none() {
            self.vcenter_password = std::env::var(ENV_VCENTER_PASSWORD).ok().none_if_empty();
        }
    }

    /// Validate the config before connecting
    ///
    /// A password and an API token are mutually substitutable for array
    /// authentication; supplying both is rejected.
    pub fn validate(&self) -> Result<()> {
        if self.array_host.trim().is_empty() {
            return Err(Error::missing_field("array_host"));
        }
        if self.array_user.trim().is_empty() {
            return Err(Error::missing_field("array_user"));
        }
        if self.vcenter_host.trim().is_empty() {
            return Err(Error::missing_field("vcenter_host"));
        }
        if self.vcenter_user.trim().is_empty() {
            return Err(Error::missing_field("vcenter_user"));
        }
        if self.array_password.is_some() && self.array_token.is_some() {
            return Err(Error::invalid_value(
                "array_token",
                "supply either an array password or an API token, not both",
            ));
        }
        url::Url::parse(&self.effective_array_url())?;
        url::Url::parse(&self.effective_vcenter_url())?;
        Ok(())
    }
}

// Secrets stay out of Debug output.
impl std::fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("array_host", &self.array_host)
            .field("array_user", &self.array_user)
            .field("array_password", &self.array_password.as_ref().map(|_| "***"))
            .field("array_token", &self.array_token.as_ref().map(|_| "***"))
            .field("vcenter_host", &self.vcenter_host)
            .field("vcenter_user", &self.vcenter_user)
            .field(
                "vcenter_password",
                &self.vcenter_password.as_ref().map(|_| "***"),
            )
            .field("verify_tls", &self.verify_tls)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Profile File
// ============================================================================

/// Non-secret connection profile loaded from YAML
///
/// Secrets deliberately have no place in the profile; they come from
/// flags, the environment, or the interactive prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    /// FlashArray endpoint
    pub array: EndpointProfile,
    /// vCenter endpoint
    pub vcenter: EndpointProfile,
    /// Whether to verify TLS certificates
    #[serde(default = "default_verify_tls")]
    pub verify_tls: bool,
}

/// Host and user for one endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointProfile {
    /// IP address or FQDN
    pub host: String,
    /// Authenticated user
    pub user: String,
}

fn default_verify_tls() -> bool {
    true
}

impl Profile {
    /// Load a profile from a YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::FileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                Error::Io(e)
            }
        })?;
        Self::from_str(&contents)
    }

    /// Parse a profile from a YAML string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(contents: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(contents)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> ConnectionConfig {
        ConnectionConfig::new("fa-420.lab", "pureuser", "vc.lab", "administrator@vsphere.local")
    }

    #[test]
    fn test_validate_ok_with_password() {
        let config = base_config().array_password("secret");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_ok_with_token() {
        let config = base_config().array_token("a1b2c3");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_ok_with_no_secrets() {
        // Missing secrets are resolved later (prompt); not a validation error.
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_password_and_token() {
        let config = base_config().array_password("secret").array_token("a1b2c3");
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidConfigValue { ref field, .. } if field == "array_token"
        ));
    }

    #[test]
    fn test_validate_rejects_empty_host() {
        let mut config = base_config();
        config.array_host = String::new();
        assert!(matches!(
            config.validate().unwrap_err(),
            Error::MissingConfigField { ref field } if field == "array_host"
        ));
    }

    #[test]
    fn test_validate_rejects_malformed_url_override() {
        let config = base_config().array_url("https://fa-420 .lab");
        assert!(matches!(
            config.validate().unwrap_err(),
            Error::InvalidUrl(_)
        ));
    }

    #[test]
    fn test_effective_urls() {
        let config = base_config();
        assert_eq!(config.effective_array_url(), "https://fa-420.lab");
        assert_eq!(config.effective_vcenter_url(), "https://vc.lab");

        let config = config.array_url("https://fa-420.lab:8443");
        assert_eq!(config.effective_array_url(), "https://fa-420.lab:8443");
    }

    #[test]
    fn test_default_verifies_tls() {
        assert!(base_config().verify_tls);
        assert!(!base_config().no_verify_tls().verify_tls);
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = base_config().array_password("fapw").vcenter_password("vcpw");
        let debug = format!("{config:?}");
        assert!(!debug.contains("fapw"));
        assert!(!debug.contains("vcpw"));
    }

    #[test]
    fn test_profile_parse() {
        let yaml = r"
array:
  host: fa-420.lab
  user: pureuser
vcenter:
  host: vc.lab
  user: administrator@vsphere.local
verify_tls: false
";
        let profile = Profile::from_str(yaml).unwrap();
        assert_eq!(profile.array.host, "fa-420.lab");
        assert_eq!(profile.vcenter.user, "administrator@vsphere.local");
        assert!(!profile.verify_tls);

        let config = ConnectionConfig::from_profile(&profile);
        assert_eq!(config.array_host, "fa-420.lab");
        assert!(!config.verify_tls);
    }

    #[test]
    fn test_profile_verify_tls_defaults_on() {
        let yaml = r"
array:
  host: fa-420.lab
  user: pureuser
vcenter:
  host: vc.lab
  user: administrator@vsphere.local
";
        let profile = Profile::from_str(yaml).unwrap();
        assert!(profile.verify_tls);
    }

    #[test]
    fn test_profile_load_missing_file() {
        let err = Profile::load("/nonexistent/profile.yaml").unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));
    }

    #[test]
    fn test_profile_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.yaml");
        std::fs::write(
            &path,
            "array:\n  host: fa-1\n  user: pureuser\nvcenter:\n  host: vc-1\n  user: admin\n",
        )
        .unwrap();
        let profile = Profile::load(&path).unwrap();
        assert_eq!(profile.array.host, "fa-1");
        assert_eq!(profile.vcenter.host, "vc-1");
    }
}
