// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # purelink
//!
//! Pure Storage FlashArray and VMware vSphere integration toolkit.
//!
//! Connects to a FlashArray REST API and a vCenter Server, holds an
//! authenticated session against each, and layers datastore maintenance
//! on top: identifying Pure-backed datastores, provisioning VMFS and
//! vVol datastores, and registering the array as a VASA storage
//! provider.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use purelink::{ConnectionConfig, Connector};
//!
//! #[tokio::main]
//! async fn main() -> purelink::Result<()> {
//!     // Secrets left out here are prompted for on the terminal
//!     let config = ConnectionConfig::new(
//!         "fa-420.lab",
//!         "pureuser",
//!         "vc.lab",
//!         "administrator@vsphere.local",
//!     )
//!     .no_verify_tls();
//!
//!     let connector = Connector::connect(&config).await?;
//!
//!     for ds in connector.datastores().pure_datastores().await? {
//!         println!("{} ({:?})", ds.name, ds.kind);
//!     }
//!
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the crate
pub mod error;

/// Common types and type aliases
pub mod types;

/// Connection configuration and profiles
pub mod config;

/// Credential handling and interactive prompting
pub mod auth;

/// HTTP client with retry and rate limiting
pub mod http;

/// FlashArray REST client
pub mod array;

/// vCenter REST client
pub mod vsphere;

/// Datastore maintenance across both back ends
pub mod datastore;

/// The top-level connector handle
pub mod connector;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::{ConnectionConfig, Profile};
pub use connector::Connector;
pub use error::{Error, Result};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
