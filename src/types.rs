//! Common types used throughout purelink
//!
//! Shared type definitions and utility types used across multiple modules.

use serde::{Deserialize, Serialize};

// ============================================================================
// Backoff Type
// ============================================================================

/// Type of backoff for retries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackoffType {
    /// Constant delay between retries
    Constant,
    /// Linear increase in delay
    Linear,
    /// Exponential increase in delay
    #[default]
    Exponential,
}

// ============================================================================
// Host Connection State
// ============================================================================

/// Connection state of an ESXi host as reported by vCenter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConnectionState {
    Connected,
    Disconnected,
    NotResponding,
}

impl ConnectionState {
    /// Whether the host can service storage operations
    pub fn is_connected(self) -> bool {
        matches!(self, ConnectionState::Connected)
    }
}

// ============================================================================
// Datastore Kind
// ============================================================================

/// Datastore type as reported by vCenter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DatastoreKind {
    Vmfs,
    Vvol,
    Nfs,
    #[serde(other)]
    Other,
}

// ============================================================================
// Utilities
// ============================================================================

/// Extension trait for Option<String> to handle empty strings
pub trait OptionStringExt {
    /// Returns None if the string is empty
    fn none_if_empty(self) -> Option<String>;
}

impl OptionStringExt for Option<String> {
    fn none_if_empty(self) -> Option<String> {
        self.filter(|s| !s.is_empty())
    }
}

impl OptionStringExt for String {
    fn none_if_empty(self) -> Option<String> {
        if self.is_empty() {
            None
        } else {
            Some(self)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_type_default() {
        assert_eq!(BackoffType::default(), BackoffType::Exponential);
    }

    #[test]
    fn test_connection_state_serde() {
        let state: ConnectionState = serde_json::from_str("\"CONNECTED\"").unwrap();
        assert_eq!(state, ConnectionState::Connected);
        assert!(state.is_connected());

        let state: ConnectionState = serde_json::from_str("\"NOT_RESPONDING\"").unwrap();
        assert!(!state.is_connected());
    }

    #[test]
    fn test_datastore_kind_serde() {
        let kind: DatastoreKind = serde_json::from_str("\"VMFS\"").unwrap();
        assert_eq!(kind, DatastoreKind::Vmfs);

        let kind: DatastoreKind = serde_json::from_str("\"VFFS\"").unwrap();
        assert_eq!(kind, DatastoreKind::Other);
    }

    #[test]
    fn test_option_string_none_if_empty() {
        assert_eq!(
            Some("test".to_string()).none_if_empty(),
            Some("test".to_string())
        );
        assert_eq!(Some(String::new()).none_if_empty(), None);
        assert_eq!(None::<String>.none_if_empty(), None);
        assert_eq!("test".to_string().none_if_empty(), Some("test".to_string()));
        assert_eq!(String::new().none_if_empty(), None);
    }
}
