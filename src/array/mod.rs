//! FlashArray REST client
//!
//! Wraps the Purity REST API: session establishment (password or
//! pre-issued API token), array info, volumes, host groups, hosts, and
//! network interfaces.

mod client;
mod types;

pub use client::{FlashArrayClient, SUPPORTED_API_VERSIONS};
pub use types::{ArrayHost, ArrayInfo, HostGroup, NetworkInterface, Volume};
