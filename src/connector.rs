//! The connector: one authenticated handle over both back ends
//!
//! Construction resolves missing secrets (blocking on an interactive
//! prompt, so plaintext credentials stay out of scripts and shell
//! history), authenticates against the FlashArray first and vCenter
//! second, and hands back the two session clients.

use crate::array::FlashArrayClient;
use crate::auth::{self, SecretPrompt, TerminalPrompt};
use crate::config::ConnectionConfig;
use crate::datastore::DatastoreManager;
use crate::error::Result;
use crate::vsphere::VSphereClient;
use tracing::debug;

/// Authenticated sessions against a FlashArray and a vCenter Server
pub struct Connector {
    array: FlashArrayClient,
    vsphere: VSphereClient,
}

impl Connector {
    /// Connect to both back ends, prompting on the terminal for any
    /// missing secret
    pub async fn connect(config: &ConnectionConfig) -> Result<Self> {
        Self::connect_with_prompt(config, &TerminalPrompt).await
    }

    /// Connect with an explicit secret source
    pub async fn connect_with_prompt(
        config: &ConnectionConfig,
        prompt: &dyn SecretPrompt,
    ) -> Result<Self> {
        config.validate()?;
        let credentials = auth::resolve(config, prompt)?;

        if !config.verify_tls {
            debug!("Connecting with TLS certificate verification disabled");
        }

        let array = FlashArrayClient::connect_url(
            &config.effective_array_url(),
            &config.array_host,
            &config.array_user,
            &credentials.array,
            config.verify_tls,
        )
        .await?;

        let vsphere = VSphereClient::connect_url(
            &config.effective_vcenter_url(),
            &config.vcenter_host,
            &config.vcenter_user,
            &credentials.vcenter_password,
            config.verify_tls,
        )
        .await?;

        Ok(Self { array, vsphere })
    }

    /// Assemble a connector from already-authenticated clients
    pub fn from_clients(array: FlashArrayClient, vsphere: VSphereClient) -> Self {
        Self { array, vsphere }
    }

    /// The FlashArray session
    pub fn array(&self) -> &FlashArrayClient {
        &self.array
    }

    /// The vCenter session
    pub fn vsphere(&self) -> &VSphereClient {
        &self.vsphere
    }

    /// Datastore maintenance over this session pair
    pub fn datastores(&self) -> DatastoreManager<'_> {
        DatastoreManager::new(&self.array, &self.vsphere)
    }

    /// Close both sessions
    pub async fn logout(&self) -> Result<()> {
        self.array.logout().await?;
        self.vsphere.logout().await
    }
}

impl std::fmt::Debug for Connector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connector")
            .field("array", &self.array)
            .field("vsphere", &self.vsphere)
            .finish()
    }
}
