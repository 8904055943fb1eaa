//! vCenter REST client implementation
//!
//! The CIS session id is cached behind an async lock; a request that
//! comes back 401 re-logs-in once and retries, so a session that
//! expires mid-run does not surface to callers.

use super::types::{
    Cluster, Datastore, DatastoreBacking, HostSystem, ProviderSpec, ScsiDisk, StorageAdapter,
    StorageContainer, TaskState, TaskStatus, ValueWrapper, VasaProvider, VmfsDatastoreSpec,
};
use crate::error::{Error, Result};
use crate::http::{HttpClient, HttpClientConfig, RequestConfig};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::json;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info};

const SESSION_PATH: &str = "/rest/com/vmware/cis/session";
const SESSION_HEADER: &str = "vmware-api-session-id";

const TASK_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Authenticated session with a vCenter Server
pub struct VSphereClient {
    http: HttpClient,
    host: String,
    username: String,
    password: String,
    session: RwLock<Option<String>>,
}

impl VSphereClient {
    /// Connect to a vCenter Server by hostname over HTTPS
    pub async fn connect(
        host: &str,
        username: &str,
        password: &str,
        verify_tls: bool,
    ) -> Result<Self> {
        Self::connect_url(&format!("https://{host}"), host, username, password, verify_tls).await
    }

    /// Connect to a vCenter Server at an explicit base URL
    ///
    /// Exists so the session flow can run against a local test server;
    /// production goes through [`VSphereClient::connect`].
    pub async fn connect_url(
        base_url: &str,
        host: &str,
        username: &str,
        password: &str,
        verify_tls: bool,
    ) -> Result<Self> {
        let http = HttpClient::with_config(
            HttpClientConfig::builder()
                .base_url(base_url)
                .verify_tls(verify_tls)
                .build(),
        );

        let client = Self {
            http,
            host: host.to_string(),
            username: username.to_string(),
            password: password.to_string(),
            session: RwLock::new(None),
        };
        client.login().await?;
        info!("Authenticated to vCenter {} as {}", host, username);
        Ok(client)
    }

    /// Open a CIS session and cache its id
    async fn login(&self) -> Result<()> {
        let response: ValueWrapper<String> = self
            .http
            .request_json(
                Method::POST,
                SESSION_PATH,
                RequestConfig::new().basic_auth(&self.username, &self.password),
            )
            .await
            .map_err(|e| match e {
                Error::HttpStatus { status, body } if status == 401 || status == 403 => {
                    Error::Auth {
                        message: format!("vCenter rejected credentials (HTTP {status}): {body}"),
                    }
                }
                other => other,
            })?;

        let mut session = self.session.write().await;
        *session = Some(response.value);
        debug!("vCenter session established");
        Ok(())
    }

    /// Close the session
    pub async fn logout(&self) -> Result<()> {
        let config = self.session_config().await?;
        self.http
            .delete_with_config(SESSION_PATH, config)
            .await?;
        let mut session = self.session.write().await;
        *session = None;
        Ok(())
    }

    /// vCenter hostname this client is connected to
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Authenticated username
    pub fn username(&self) -> &str {
        &self.username
    }

    // ========================================================================
    // Inventory
    // ========================================================================

    /// List compute clusters, optionally filtered by name
    pub async fn list_clusters(&self, name: Option<&str>) -> Result<Vec<Cluster>> {
        let mut config = RequestConfig::new();
        if let Some(name) = name {
            config = config.query("filter.names", name);
        }
        self.get_value("/rest/vcenter/cluster", config).await
    }

    /// Find a cluster by name
    pub async fn find_cluster(&self, name: &str) -> Result<Cluster> {
        self.list_clusters(Some(name))
            .await?
            .into_iter()
            .find(|c| c.name == name)
            .ok_or_else(|| Error::ClusterNotFound {
                cluster: name.to_string(),
            })
    }

    /// List hosts, optionally restricted to one cluster
    pub async fn list_hosts(&self, cluster: Option<&str>) -> Result<Vec<HostSystem>> {
        let mut config = RequestConfig::new();
        if let Some(cluster) = cluster {
            config = config.query("filter.clusters", cluster);
        }
        self.get_value("/rest/vcenter/host", config).await
    }

    /// List datastores
    pub async fn list_datastores(&self) -> Result<Vec<Datastore>> {
        self.get_value("/rest/vcenter/datastore", RequestConfig::new())
            .await
    }

    /// Backing devices of a datastore
    pub async fn datastore_backing(&self, datastore: &str) -> Result<DatastoreBacking> {
        self.get_value(
            &format!("/rest/vcenter/datastore/{datastore}/backing"),
            RequestConfig::new(),
        )
        .await
    }

    // ========================================================================
    // Host storage
    // ========================================================================

    /// Storage adapters of a host
    pub async fn storage_adapters(&self, host: &str) -> Result<Vec<StorageAdapter>> {
        self.get_value(
            &format!("/rest/vcenter/host/{host}/storage/adapters"),
            RequestConfig::new(),
        )
        .await
    }

    /// Rescan all storage adapters on a host
    pub async fn rescan_storage(&self, host: &str) -> Result<()> {
        self.post_empty(
            &format!("/rest/vcenter/host/{host}/storage"),
            RequestConfig::new().query("action", "rescan"),
        )
        .await
    }

    /// Disks available for VMFS datastore creation on a host
    pub async fn available_disks(&self, host: &str) -> Result<Vec<ScsiDisk>> {
        self.get_value(
            &format!("/rest/vcenter/host/{host}/storage/disks"),
            RequestConfig::new().query("filter.available_for_vmfs", "true"),
        )
        .await
    }

    /// Create a VMFS datastore on a host, returning the datastore id
    pub async fn create_vmfs_datastore(
        &self,
        host: &str,
        spec: &VmfsDatastoreSpec,
    ) -> Result<String> {
        let body = json!({
            "spec": {
                "type": "VMFS",
                "host": host,
                "name": spec.name,
                "device_path": spec.device_path,
                "vmfs_version": spec.vmfs_version,
            }
        });
        self.post_value("/rest/vcenter/datastore", RequestConfig::new().json(body))
            .await
    }

    /// Create a vVol datastore against a storage container, returning the
    /// datastore id
    pub async fn create_vvol_datastore(
        &self,
        host: &str,
        name: &str,
        container_uuid: &str,
    ) -> Result<String> {
        let body = json!({
            "spec": {
                "type": "VVOL",
                "host": host,
                "name": name,
                "container_id": container_uuid,
            }
        });
        self.post_value("/rest/vcenter/datastore", RequestConfig::new().json(body))
            .await
    }

    // ========================================================================
    // vVol containers and VASA providers
    // ========================================================================

    /// List vVol storage containers known to vCenter
    pub async fn storage_containers(&self) -> Result<Vec<StorageContainer>> {
        self.get_value("/rest/vcenter/storage/containers", RequestConfig::new())
            .await
    }

    /// List registered VASA providers
    pub async fn list_providers(&self) -> Result<Vec<VasaProvider>> {
        self.get_value("/rest/vcenter/storage/providers", RequestConfig::new())
            .await
    }

    /// Register a VASA provider, returning the registration task id
    pub async fn register_provider(&self, spec: &ProviderSpec) -> Result<String> {
        let body = json!({ "spec": spec });
        self.post_value(
            "/rest/vcenter/storage/providers",
            RequestConfig::new().json(body),
        )
        .await
    }

    /// Query the status of a provider registration task
    pub async fn provider_task(&self, task: &str) -> Result<TaskStatus> {
        self.get_value(
            &format!("/rest/vcenter/storage/providers/tasks/{task}"),
            RequestConfig::new(),
        )
        .await
    }

    /// Poll a provider task until it completes or the deadline passes
    pub async fn wait_for_provider_task(
        &self,
        task: &str,
        timeout: Duration,
    ) -> Result<TaskStatus> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            let status = self.provider_task(task).await?;
            match status.state {
                TaskState::Succeeded => return Ok(status),
                TaskState::Failed => {
                    return Err(Error::task_failed(
                        status.error.unwrap_or_else(|| "no error reported".to_string()),
                    ))
                }
                TaskState::Running => {
                    if tokio::time::Instant::now() >= deadline {
                        return Err(Error::TaskTimeout {
                            timeout_secs: timeout.as_secs(),
                        });
                    }
                    tokio::time::sleep(TASK_POLL_INTERVAL).await;
                }
            }
        }
    }

    // ========================================================================
    // Request plumbing
    // ========================================================================

    /// Request config carrying the session header
    async fn session_config(&self) -> Result<RequestConfig> {
        let session = self.session.read().await;
        let id = session
            .as_ref()
            .ok_or_else(|| Error::auth("no active vCenter session"))?;
        Ok(RequestConfig::new().header(SESSION_HEADER, id.clone()))
    }

    fn merge(base: RequestConfig, extra: &RequestConfig) -> RequestConfig {
        let mut merged = base;
        for (k, v) in &extra.query {
            merged = merged.query(k.clone(), v.clone());
        }
        for (k, v) in &extra.headers {
            merged = merged.header(k.clone(), v.clone());
        }
        if let Some(body) = &extra.body {
            merged = merged.json(body.clone());
        }
        merged
    }

    async fn get_value<T: DeserializeOwned>(
        &self,
        path: &str,
        config: RequestConfig,
    ) -> Result<T> {
        let wrapper: ValueWrapper<T> = self.send(Method::GET, path, &config).await?;
        Ok(wrapper.value)
    }

    async fn post_value<T: DeserializeOwned>(
        &self,
        path: &str,
        config: RequestConfig,
    ) -> Result<T> {
        let wrapper: ValueWrapper<T> = self.send(Method::POST, path, &config).await?;
        Ok(wrapper.value)
    }

    async fn post_empty(&self, path: &str, config: RequestConfig) -> Result<()> {
        let session = Self::merge(self.session_config().await?, &config);
        match self.http.post_with_config(path, session).await {
            Ok(_) => Ok(()),
            Err(Error::HttpStatus { status: 401, .. }) => {
                self.login().await?;
                let session = Self::merge(self.session_config().await?, &config);
                self.http.post_with_config(path, session).await?;
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Send a request with the session header, re-logging-in once on 401
    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        config: &RequestConfig,
    ) -> Result<T> {
        let session = Self::merge(self.session_config().await?, config);
        match self.http.request_json(method.clone(), path, session).await {
            Ok(value) => Ok(value),
            Err(Error::HttpStatus { status: 401, .. }) => {
                debug!("vCenter session expired, re-authenticating");
                self.login().await?;
                let session = Self::merge(self.session_config().await?, config);
                self.http.request_json(method, path, session).await
            }
            Err(e) => Err(e),
        }
    }
}

impl std::fmt::Debug for VSphereClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VSphereClient")
            .field("host", &self.host)
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}
