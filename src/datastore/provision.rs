//! Provisioning flows spanning both back ends
//!
//! Each flow verifies the vSphere cluster against the array first, then
//! performs array-side changes, then makes the result visible to ESXi
//! (rescans) before touching vCenter datastore state.

use super::ident::{device_path_for_serial, is_pure_device};
use super::mapping::hgroup_for_hosts;
use crate::array::FlashArrayClient;
use crate::error::{Error, Result};
use crate::vsphere::{
    Datastore, HostSystem, ProviderSpec, VSphereClient, VasaProvider, VmfsDatastoreSpec,
};
use std::time::Duration;
use tracing::{debug, info};

/// Protocol endpoint name used when the caller does not pick one
pub const DEFAULT_PROTOCOL_ENDPOINT: &str = "pure-protocol-endpoint";

/// Port the array-side VASA provider listens on
pub const PROVIDER_PORT: u16 = 8084;

/// Credentials the array-side provider expects at registration
const PROVIDER_USER: &str = "pureuser";

const DEFAULT_TASK_TIMEOUT: Duration = Duration::from_secs(30);

/// Datastore maintenance over an array/vCenter session pair
pub struct DatastoreManager<'a> {
    array: &'a FlashArrayClient,
    vsphere: &'a VSphereClient,
}

impl<'a> DatastoreManager<'a> {
    /// Create a manager over existing sessions
    pub fn new(array: &'a FlashArrayClient, vsphere: &'a VSphereClient) -> Self {
        Self { array, vsphere }
    }

    /// List datastores backed by FlashArray volumes
    pub async fn pure_datastores(&self) -> Result<Vec<Datastore>> {
        let mut pure = Vec::new();
        for datastore in self.vsphere.list_datastores().await? {
            let backing = self.vsphere.datastore_backing(&datastore.datastore).await?;
            if backing.devices.iter().any(|d| is_pure_device(d)) {
                pure.push(datastore);
            }
        }
        Ok(pure)
    }

    /// Verify a cluster and resolve its host group
    ///
    /// Returns the host group name and the cluster's connected hosts.
    /// Mirrors the checks run before any datastore creation: the cluster
    /// must exist, have connected hosts, and map to exactly one host
    /// group on the array.
    pub async fn verify_cluster(&self, cluster_name: &str) -> Result<(String, Vec<HostSystem>)> {
        let cluster = self.vsphere.find_cluster(cluster_name).await?;
        let hosts = self.vsphere.list_hosts(Some(&cluster.cluster)).await?;

        let connected: Vec<HostSystem> = hosts
            .into_iter()
            .filter(|h| h.connection_state.is_connected())
            .collect();
        if connected.is_empty() {
            return Err(Error::NoConnectedHosts {
                cluster: cluster_name.to_string(),
            });
        }

        let array_name = self.array.info().await?.array_name;
        let array_hosts = self.array.list_hosts().await?;

        let mut esxi_hosts = Vec::new();
        for host in &connected {
            let adapters = self.vsphere.storage_adapters(&host.host).await?;
            let initiators: Vec<String> =
                adapters.iter().filter_map(|a| a.initiator_id()).collect();
            esxi_hosts.push((host.name.clone(), initiators));
        }

        let hgroup = hgroup_for_hosts(cluster_name, &array_name, &esxi_hosts, &array_hosts)?;
        debug!("Cluster '{}' maps to host group '{}'", cluster_name, hgroup);

        Ok((hgroup, connected))
    }

    /// Create a VMFS datastore on a new array volume
    ///
    /// Returns the new datastore identifier.
    pub async fn create_vmfs(
        &self,
        cluster_name: &str,
        ds_name: &str,
        size_gb: u64,
        vmfs_version: Option<u32>,
    ) -> Result<String> {
        let (hgroup, connected) = self.verify_cluster(cluster_name).await?;

        let volume = self.array.create_volume(ds_name, size_gb).await?;
        self.array.connect_hgroup(&hgroup, &volume.name).await?;
        info!(
            "Volume '{}' ({}G) connected to host group '{}'",
            volume.name, size_gb, hgroup
        );

        // One host carries out the creation; it has to see the new volume
        // first.
        let first = &connected[0];
        self.vsphere.rescan_storage(&first.host).await?;

        let disks = self.vsphere.available_disks(&first.host).await?;
        let device_path = device_path_for_serial(&disks, &volume.serial).ok_or_else(|| {
            Error::DeviceNotFound {
                host: first.name.clone(),
                serial: volume.serial.clone(),
            }
        })?;

        let spec = VmfsDatastoreSpec {
            name: ds_name.to_string(),
            device_path: device_path.to_string(),
            vmfs_version,
        };
        let datastore = self.vsphere.create_vmfs_datastore(&first.host, &spec).await?;
        info!("VMFS datastore '{}' created ({})", ds_name, datastore);

        self.rescan_all(&connected).await?;
        Ok(datastore)
    }

    /// Create a vVol datastore against this array's storage container
    ///
    /// Ensures a protocol endpoint is connected to the cluster's host
    /// group first. Returns the new datastore identifier.
    pub async fn create_vvol(
        &self,
        cluster_name: &str,
        ds_name: &str,
        protocol_endpoint: Option<&str>,
    ) -> Result<String> {
        let pe_name = protocol_endpoint.unwrap_or(DEFAULT_PROTOCOL_ENDPOINT);
        let (hgroup, connected) = self.verify_cluster(cluster_name).await?;

        let existing = self.array.list_volumes(true).await?;
        if existing.iter().any(|v| v.name == pe_name) {
            return Err(Error::ProtocolEndpointExists {
                name: pe_name.to_string(),
            });
        }

        let endpoint = self.array.create_protocol_endpoint(pe_name).await?;
        self.array.connect_hgroup(&hgroup, &endpoint.name).await?;
        info!(
            "Protocol endpoint '{}' connected to host group '{}'",
            endpoint.name, hgroup
        );
        self.rescan_all(&connected).await?;

        let container = self.find_storage_container().await?;

        let mut datastore = String::new();
        for host in &connected {
            datastore = self
                .vsphere
                .create_vvol_datastore(&host.host, ds_name, &container)
                .await?;
        }
        info!("vVol datastore '{}' created ({})", ds_name, datastore);

        self.rescan_all(&connected).await?;
        Ok(datastore)
    }

    /// Register this array as a VASA provider with vCenter
    ///
    /// `controller_address` is the address of a controller interface,
    /// not the floating `vir0/1` address.
    pub async fn register_provider(
        &self,
        controller_address: &str,
        timeout: Option<Duration>,
    ) -> Result<VasaProvider> {
        let interfaces = self.array.list_network_interfaces().await?;
        let controller = interfaces
            .iter()
            .find(|i| !i.is_virtual() && i.address.as_deref() == Some(controller_address))
            .map(|i| i.controller().to_string())
            .ok_or_else(|| Error::ControllerNotFound {
                address: controller_address.to_string(),
            })?;

        let array_name = self.array.info().await?.array_name;
        let spec = ProviderSpec {
            name: format!("{array_name}-{controller}"),
            url: format!("https://{controller_address}:{PROVIDER_PORT}/version.xml"),
            username: PROVIDER_USER.to_string(),
            password: PROVIDER_USER.to_string(),
        };

        let task = self.vsphere.register_provider(&spec).await?;
        self.vsphere
            .wait_for_provider_task(&task, timeout.unwrap_or(DEFAULT_TASK_TIMEOUT))
            .await?;

        self.vsphere
            .list_providers()
            .await?
            .into_iter()
            .find(|p| p.url == spec.url)
            .ok_or(Error::ProviderNotFound { url: spec.url })
    }

    /// Find the vVol storage container belonging to this array
    async fn find_storage_container(&self) -> Result<String> {
        let info = self.array.info().await?;
        let containers = self.vsphere.storage_containers().await?;

        // Container array ids look like `com.purestorage:<array-id>`.
        containers
            .into_iter()
            .find(|c| {
                c.array_ids
                    .iter()
                    .any(|id| id.split(':').nth(1) == Some(info.id.as_str()))
            })
            .map(|c| c.uuid)
            .ok_or(Error::ContainerNotFound {
                array: info.array_name,
            })
    }

    /// Rescan storage adapters on every given host
    async fn rescan_all(&self, hosts: &[HostSystem]) -> Result<()> {
        for host in hosts {
            self.vsphere.rescan_storage(&host.host).await?;
        }
        Ok(())
    }
}
