//! Datastore maintenance for Pure-backed VMware environments
//!
//! Identifies which datastores sit on FlashArray volumes, maps vSphere
//! clusters onto array host groups, and drives VMFS/vVol provisioning
//! and VASA provider registration across both back ends.

mod ident;
mod mapping;
mod provision;

pub use ident::{device_path_for_serial, is_pure_device, serial_matches_device, PURE_IDENTIFIER};
pub use mapping::{hgroup_for_hosts, match_array_host};
pub use provision::{DatastoreManager, DEFAULT_PROTOCOL_ENDPOINT, PROVIDER_PORT};
