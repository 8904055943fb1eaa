//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Pure Storage FlashArray / VMware vSphere integration toolkit
#[derive(Parser, Debug)]
#[command(name = "purelink")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Connection profile file (YAML)
    #[arg(short, long, global = true)]
    pub profile: Option<PathBuf>,

    /// FlashArray IP address or FQDN
    #[arg(long, global = true)]
    pub array_host: Option<String>,

    /// FlashArray user
    #[arg(long, global = true)]
    pub array_user: Option<String>,

    /// FlashArray password (omit to be prompted)
    #[arg(long, global = true)]
    pub array_password: Option<String>,

    /// FlashArray API token (alternative to the password)
    #[arg(long, global = true)]
    pub array_token: Option<String>,

    /// vCenter Server IP address or FQDN
    #[arg(long, global = true)]
    pub vcenter_host: Option<String>,

    /// vCenter user
    #[arg(long, global = true)]
    pub vcenter_user: Option<String>,

    /// vCenter password (omit to be prompted)
    #[arg(long, global = true)]
    pub vcenter_password: Option<String>,

    /// Skip TLS certificate verification (self-signed lab certs)
    #[arg(long, global = true)]
    pub no_verify_tls: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "pretty")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Authenticate against both back ends and report
    Check,

    /// Show array identity and vCenter inventory counts
    Info,

    /// List datastores backed by FlashArray volumes
    Datastores,

    /// Create a VMFS datastore on a new array volume
    CreateVmfs {
        /// vSphere cluster to attach the datastore to
        #[arg(long)]
        cluster: String,

        /// Datastore (and volume) name
        #[arg(long)]
        name: String,

        /// Volume size in gigabytes
        #[arg(long)]
        size: u64,

        /// VMFS major version (vCenter default when omitted)
        #[arg(long)]
        vmfs_version: Option<u32>,
    },

    /// Create a vVol datastore against the array's storage container
    CreateVvol {
        /// vSphere cluster to attach the datastore to
        #[arg(long)]
        cluster: String,

        /// Datastore name
        #[arg(long)]
        name: String,

        /// Protocol endpoint name on the array
        #[arg(long)]
        protocol_endpoint: Option<String>,
    },

    /// Register the array as a VASA storage provider
    RegisterProvider {
        /// Controller interface address (not the vir0/1 address)
        #[arg(long)]
        address: String,

        /// Seconds to wait for the registration task
        #[arg(long, default_value = "30")]
        timeout: u64,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one document per command)
    Json,
    /// Human-readable output
    Pretty,
}
