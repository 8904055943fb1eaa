//! Wire types for the Purity REST API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Array identity and software level, as returned by `GET array`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArrayInfo {
    /// Array name
    pub array_name: String,
    /// Array id (the uuid embedded in vVol container array ids)
    pub id: String,
    /// Purity version
    #[serde(default)]
    pub version: Option<String>,
    /// Purity revision
    #[serde(default)]
    pub revision: Option<String>,
}

/// A volume on the array
///
/// Protocol-endpoint (conglomerate) volumes come back from the same
/// resource with no size.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Volume {
    /// Volume name
    pub name: String,
    /// Provisioned size in bytes
    #[serde(default)]
    pub size: u64,
    /// Volume serial number as shown by `purevol list` (upper-case hex)
    pub serial: String,
    /// Creation timestamp
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
}

/// A host object on the array
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArrayHost {
    /// Host name
    pub name: String,
    /// Fibre-channel port WWNs
    #[serde(default)]
    pub wwn: Vec<String>,
    /// iSCSI qualified names
    #[serde(default)]
    pub iqn: Vec<String>,
    /// Host group this host belongs to, if any
    #[serde(default)]
    pub hgroup: Option<String>,
}

/// A host group on the array
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostGroup {
    /// Host group name
    pub name: String,
    /// Member host names
    #[serde(default)]
    pub hosts: Vec<String>,
}

/// A network interface on the array
///
/// Physical interfaces are named per controller (`ct0.eth0`); `vir*`
/// names are floating virtual addresses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkInterface {
    /// Interface name
    pub name: String,
    /// Assigned address, if configured
    #[serde(default)]
    pub address: Option<String>,
    /// Services bound to the interface (management, iscsi, ...)
    #[serde(default)]
    pub services: Vec<String>,
}

impl NetworkInterface {
    /// Whether this is a floating virtual interface rather than a
    /// controller-bound one
    pub fn is_virtual(&self) -> bool {
        self.name.starts_with("vir")
    }

    /// Controller name portion of the interface name (`ct0.eth0` -> `ct0`)
    pub fn controller(&self) -> &str {
        self.name.split('.').next().unwrap_or(&self.name)
    }
}

// ============================================================================
// Internal wire shapes
// ============================================================================

/// Response of `GET /api/api_version`
#[derive(Debug, Deserialize)]
pub(crate) struct ApiVersions {
    pub version: Vec<String>,
}

/// Response of `POST auth/apitoken`
#[derive(Debug, Deserialize)]
pub(crate) struct ApiTokenResponse {
    pub api_token: String,
}

/// Response of `POST auth/session`
#[derive(Debug, Deserialize)]
pub(crate) struct SessionResponse {
    #[allow(dead_code)]
    pub username: String,
}

/// One entry of a Purity error body (the API returns a JSON array of these)
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorEntry {
    pub msg: String,
    #[serde(default)]
    #[allow(dead_code)]
    pub ctx: Option<String>,
}
