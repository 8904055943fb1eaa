//! vCenter REST client
//!
//! Drives the vSphere Automation API: CIS session management, inventory
//! (clusters, hosts, datastores), per-host storage operations, vVol
//! storage containers, and VASA provider registration.

mod client;
mod types;

pub use client::VSphereClient;
pub use types::{
    AdapterKind, Cluster, Datastore, DatastoreBacking, HostSystem, ProviderSpec, ScsiDisk,
    StorageAdapter, StorageContainer, TaskState, TaskStatus, VasaProvider, VmfsDatastoreSpec,
};
