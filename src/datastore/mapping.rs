//! ESXi-host to array-host mapping
//!
//! An ESXi host corresponds to the array host object that carries one
//! of its initiator identifiers (fibre-channel WWPN or iSCSI IQN).
//! Clusters map onto host groups through their member hosts; a cluster
//! must resolve to exactly one host group.

use crate::array::ArrayHost;
use crate::error::{Error, Result};
use std::collections::BTreeSet;

/// Match a set of initiator identifiers against array host objects
///
/// Identifiers are expected normalized (lower-case, WWNs without
/// separators), as produced by `StorageAdapter::initiator_id`.
pub fn match_array_host<'a>(
    initiators: &[String],
    array_hosts: &'a [ArrayHost],
) -> Option<&'a ArrayHost> {
    for initiator in initiators {
        let is_wwn = initiator.chars().next().is_some_and(|c| c.is_ascii_digit());
        for host in array_hosts {
            if is_wwn {
                if host.wwn.iter().any(|wwn| wwn.to_lowercase() == *initiator) {
                    return Some(host);
                }
            } else if initiator.starts_with("iqn")
                && host.iqn.iter().any(|iqn| iqn.to_lowercase() == *initiator)
            {
                return Some(host);
            }
        }
    }
    None
}

/// Resolve the single host group behind a cluster's ESXi hosts
///
/// `esxi_hosts` pairs each host name with its normalized initiator
/// identifiers. Every host must map to an array host object that is a
/// member of a host group, and all hosts must land in the same group.
pub fn hgroup_for_hosts(
    cluster: &str,
    array_name: &str,
    esxi_hosts: &[(String, Vec<String>)],
    array_hosts: &[ArrayHost],
) -> Result<String> {
    let mut host_groups = BTreeSet::new();

    for (esxi_name, initiators) in esxi_hosts {
        let matched =
            match_array_host(initiators, array_hosts).ok_or_else(|| Error::HostNotMapped {
                host: esxi_name.clone(),
                array: array_name.to_string(),
            })?;

        match &matched.hgroup {
            Some(hgroup) => {
                host_groups.insert(hgroup.clone());
            }
            None => {
                return Err(Error::host_group(format!(
                    "ESXi host '{esxi_name}' maps to FlashArray host object '{}' on '{array_name}' \
                     but is not associated with any host group",
                    matched.name
                )))
            }
        }
    }

    if host_groups.is_empty() {
        return Err(Error::host_group(format!(
            "no host group found for vSphere cluster '{cluster}' on FlashArray '{array_name}'"
        )));
    }

    if host_groups.len() > 1 {
        return Err(Error::host_group(format!(
            "vSphere cluster '{cluster}' spans more than one host group on FlashArray \
             '{array_name}'; one host group per cluster is recommended"
        )));
    }

    Ok(host_groups.into_iter().next().unwrap())
}
