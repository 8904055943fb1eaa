//! Pure Storage device identification
//!
//! FlashArray volumes carry the Pure OUI inside their SCSI canonical
//! names, at a fixed offset that differs between the NAA and EUI
//! formats:
//!
//! ```text
//! naa.624a93703b7b308d98f9425e000113e9
//!      ^^^^^^ bytes 5..11
//! eui.003b7b308d98f94224a9375e00018816
//!                     ^^^^^^ bytes 20..26
//! ```

use crate::vsphere::ScsiDisk;

/// The Pure Storage OUI as it appears in device canonical names
pub const PURE_IDENTIFIER: &str = "24a937";

/// Whether a canonical device name refers to a FlashArray volume
pub fn is_pure_device(device: &str) -> bool {
    let device = device.to_lowercase();
    if device.starts_with("naa") {
        device.get(5..11) == Some(PURE_IDENTIFIER)
    } else if device.starts_with("eui") {
        device.get(20..26) == Some(PURE_IDENTIFIER)
    } else {
        false
    }
}

/// Whether a canonical device name corresponds to an array volume serial
///
/// Array serials are upper-case (`purevol list` style); canonical names
/// are lower-case, so the comparison normalizes both sides. For EUI
/// names the serial is split around the embedded OUI.
pub fn serial_matches_device(device: &str, serial: &str) -> bool {
    let device = device.to_lowercase();
    let serial = serial.to_lowercase();
    if let Some(tail) = device.strip_prefix("naa.") {
        tail.get(8..) == Some(serial.as_str())
    } else if let Some(tail) = device.strip_prefix("eui.") {
        tail.get(2..)
            .map(|t| t.replace(PURE_IDENTIFIER, ""))
            .as_deref()
            == Some(serial.as_str())
    } else {
        false
    }
}

/// Find the ESXi device path backing an array volume
///
/// `disks` comes from the host's available-disks query; a None return
/// means the volume is not (yet) visible to the host.
pub fn device_path_for_serial<'a>(disks: &'a [ScsiDisk], serial: &str) -> Option<&'a str> {
    disks
        .iter()
        .find(|disk| serial_matches_device(&disk.canonical_name, serial))
        .map(|disk| disk.device_path.as_str())
}
