//! Wire types for the vSphere Automation API
//!
//! Every response arrives wrapped in `{"value": ...}`; the client
//! unwraps before these types reach callers.

use crate::types::{ConnectionState, DatastoreKind};
use serde::{Deserialize, Serialize};

/// A compute cluster
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cluster {
    /// Cluster identifier (`domain-c...`)
    pub cluster: String,
    /// Display name
    pub name: String,
}

/// An ESXi host
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostSystem {
    /// Host identifier (`host-...`)
    pub host: String,
    /// Display name (usually the FQDN)
    pub name: String,
    /// Connection state as seen by vCenter
    pub connection_state: ConnectionState,
}

/// Kind of storage host bus adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdapterKind {
    FibreChannel,
    Iscsi,
    #[serde(other)]
    Other,
}

/// A storage HBA on an ESXi host
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageAdapter {
    /// Adapter device name (`vmhba1`)
    pub adapter: String,
    /// Adapter kind
    #[serde(rename = "type")]
    pub kind: AdapterKind,
    /// Port world wide name, fibre-channel adapters only
    #[serde(default)]
    pub port_wwn: Option<String>,
    /// iSCSI qualified name, iSCSI adapters only
    #[serde(default)]
    pub iqn: Option<String>,
}

impl StorageAdapter {
    /// Normalized initiator identifier for matching against array host
    /// objects: lower-case, WWNs with separators stripped
    ///
    /// Adapters of other kinds (e.g. NVMe, which vCenter does not yet
    /// expose an initiator for here) return None and are skipped.
    pub fn initiator_id(&self) -> Option<String> {
        match self.kind {
            AdapterKind::FibreChannel => self
                .port_wwn
                .as_ref()
                .map(|wwn| wwn.replace(':', "").to_lowercase()),
            AdapterKind::Iscsi => self.iqn.as_ref().map(|iqn| iqn.to_lowercase()),
            AdapterKind::Other => None,
        }
    }
}

/// A datastore summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Datastore {
    /// Datastore identifier (`datastore-...`)
    pub datastore: String,
    /// Display name
    pub name: String,
    /// Datastore type
    #[serde(rename = "type")]
    pub kind: DatastoreKind,
    /// Total capacity in bytes
    #[serde(default)]
    pub capacity: u64,
    /// Free space in bytes
    #[serde(default)]
    pub free_space: u64,
}

/// Backing devices of a datastore
///
/// Canonical device names (`naa....` / `eui....`); vVol datastores
/// report their protocol-endpoint devices here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatastoreBacking {
    /// Canonical names of the backing devices
    #[serde(default)]
    pub devices: Vec<String>,
}

/// A disk device available for VMFS datastore creation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScsiDisk {
    /// Canonical name (`naa....`)
    pub canonical_name: String,
    /// Full device path (`/vmfs/devices/disks/naa....`)
    pub device_path: String,
}

/// Spec for creating a VMFS datastore
#[derive(Debug, Clone, Serialize)]
pub struct VmfsDatastoreSpec {
    /// Requested datastore name
    pub name: String,
    /// Device path of the backing disk
    pub device_path: String,
    /// VMFS major version; vCenter picks its default when omitted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vmfs_version: Option<u32>,
}

/// A vVol storage container
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageContainer {
    /// Container uuid
    pub uuid: String,
    /// Display name
    pub name: String,
    /// Backing array ids, e.g. `com.purestorage:3b7b308d-...`
    #[serde(default)]
    pub array_ids: Vec<String>,
}

/// A registered VASA provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VasaProvider {
    /// Provider identifier
    pub provider: String,
    /// Display name
    pub name: String,
    /// Registration URL
    pub url: String,
}

/// Spec for registering a VASA provider
#[derive(Debug, Clone, Serialize)]
pub struct ProviderSpec {
    /// Display name
    pub name: String,
    /// Provider URL (`https://<controller-ip>:8084/version.xml`)
    pub url: String,
    /// Provider-side username
    pub username: String,
    /// Provider-side password
    pub password: String,
}

/// State of an async vCenter task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskState {
    Running,
    Succeeded,
    Failed,
}

/// Status of an async vCenter task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskStatus {
    /// Current state
    pub state: TaskState,
    /// Failure message, present when the task failed
    #[serde(default)]
    pub error: Option<String>,
}

/// The `{"value": ...}` envelope every Automation API response uses
#[derive(Debug, Deserialize)]
pub(crate) struct ValueWrapper<T> {
    pub value: T,
}
