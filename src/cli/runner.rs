//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::{ConnectionConfig, Profile};
use crate::connector::Connector;
use crate::error::{Error, Result};
use serde_json::json;
use std::time::Duration;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let config = self.build_config()?;
        let connector = Connector::connect(&config).await?;

        match &self.cli.command {
            Commands::Check => self.check(&connector).await,
            Commands::Info => self.info(&connector).await,
            Commands::Datastores => self.datastores(&connector).await,
            Commands::CreateVmfs {
                cluster,
                name,
                size,
                vmfs_version,
            } => {
                let datastore = connector
                    .datastores()
                    .create_vmfs(cluster, name, *size, *vmfs_version)
                    .await?;
                self.emit(
                    &json!({ "datastore": datastore, "name": name }),
                    &format!("Created VMFS datastore '{name}' ({datastore})"),
                )
            }
            Commands::CreateVvol {
                cluster,
                name,
                protocol_endpoint,
            } => {
                let datastore = connector
                    .datastores()
                    .create_vvol(cluster, name, protocol_endpoint.as_deref())
                    .await?;
                self.emit(
                    &json!({ "datastore": datastore, "name": name }),
                    &format!("Created vVol datastore '{name}' ({datastore})"),
                )
            }
            Commands::RegisterProvider { address, timeout } => {
                let provider = connector
                    .datastores()
                    .register_provider(address, Some(Duration::from_secs(*timeout)))
                    .await?;
                self.emit(
                    &json!({ "provider": provider.provider, "name": provider.name, "url": provider.url }),
                    &format!("Registered provider '{}' ({})", provider.name, provider.url),
                )
            }
        }
    }

    /// Assemble the connection config from profile, flags, and environment
    ///
    /// Precedence: flags over profile; secrets additionally fall back to
    /// the environment, and whatever is still missing is prompted for at
    /// connect time.
    fn build_config(&self) -> Result<ConnectionConfig> {
        let mut config = match &self.cli.profile {
            Some(path) => ConnectionConfig::from_profile(&Profile::load(path)?),
            None => {
                let array_host = self
                    .cli
                    .array_host
                    .clone()
                    .ok_or_else(|| Error::missing_field("array_host"))?;
                let array_user = self
                    .cli
                    .array_user
                    .clone()
                    .ok_or_else(|| Error::missing_field("array_user"))?;
                let vcenter_host = self
                    .cli
                    .vcenter_host
                    .clone()
                    .ok_or_else(|| Error::missing_field("vcenter_host"))?;
                let vcenter_user = self
                    .cli
                    .vcenter_user
                    .clone()
                    .ok_or_else(|| Error::missing_field("vcenter_user"))?;
                ConnectionConfig::new(array_host, array_user, vcenter_host, vcenter_user)
            }
        };

        // Flags override the profile
        if let Some(host) = &self.cli.array_host {
            config.array_host = host.clone();
        }
        if let Some(user) = &self.cli.array_user {
            config.array_user = user.clone();
        }
        if let Some(host) = &self.cli.vcenter_host {
            config.vcenter_host = host.clone();
        }
        if let Some(user) = &self.cli.vcenter_user {
            config.vcenter_user = user.clone();
        }
        if let Some(password) = &self.cli.array_password {
            config.array_password = Some(password.clone());
        }
        if let Some(token) = &self.cli.array_token {
            config.array_token = Some(token.clone());
        }
        if let Some(password) = &self.cli.vcenter_password {
            config.vcenter_password = Some(password.clone());
        }
        if self.cli.no_verify_tls {
            config.verify_tls = false;
        }

        config.secrets_from_env();
        config.validate()?;
        Ok(config)
    }

    async fn check(&self, connector: &Connector) -> Result<()> {
        let info = connector.array().info().await?;
        self.emit(
            &json!({
                "array": {
                    "host": connector.array().host(),
                    "name": info.array_name,
                    "purity_version": info.version,
                    "api_version": connector.array().api_version(),
                },
                "vcenter": {
                    "host": connector.vsphere().host(),
                    "user": connector.vsphere().username(),
                },
                "status": "ok",
            }),
            &format!(
                "FlashArray '{}' (Purity {}) and vCenter '{}': authentication OK",
                info.array_name,
                info.version.as_deref().unwrap_or("unknown"),
                connector.vsphere().host()
            ),
        )
    }

    async fn info(&self, connector: &Connector) -> Result<()> {
        let info = connector.array().info().await?;
        let volumes = connector.array().list_volumes(false).await?;
        let hosts = connector.array().list_hosts().await?;
        let clusters = connector.vsphere().list_clusters(None).await?;
        let datastores = connector.vsphere().list_datastores().await?;

        self.emit(
            &json!({
                "array": {
                    "name": info.array_name,
                    "id": info.id,
                    "purity_version": info.version,
                    "volumes": volumes.len(),
                    "hosts": hosts.len(),
                },
                "vcenter": {
                    "clusters": clusters.len(),
                    "datastores": datastores.len(),
                },
            }),
            &format!(
                "Array '{}': {} volumes, {} hosts | vCenter: {} clusters, {} datastores",
                info.array_name,
                volumes.len(),
                hosts.len(),
                clusters.len(),
                datastores.len()
            ),
        )
    }

    async fn datastores(&self, connector: &Connector) -> Result<()> {
        let datastores = connector.datastores().pure_datastores().await?;

        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&datastores)?);
            }
            OutputFormat::Pretty => {
                if datastores.is_empty() {
                    println!("No Pure-backed datastores found");
                }
                for ds in &datastores {
                    println!(
                        "{}  {:?}  {:.1} GiB free of {:.1} GiB  ({})",
                        ds.name,
                        ds.kind,
                        ds.free_space as f64 / 1_073_741_824.0,
                        ds.capacity as f64 / 1_073_741_824.0,
                        ds.datastore
                    );
                }
            }
        }
        Ok(())
    }

    fn emit(&self, json: &serde_json::Value, pretty: &str) -> Result<()> {
        match self.cli.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(json)?),
            OutputFormat::Pretty => println!("{pretty}"),
        }
        Ok(())
    }
}
