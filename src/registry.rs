//! Read-only view over a hierarchical key-value store.
//!
//! The registry is an external collaborator: the scanner only needs child
//! enumeration and string-value reads, so that surface is a trait. The
//! shipped implementation is an offline JSON snapshot, which makes the
//! scanner usable on non-Windows hosts and trivially testable; a live
//! platform binding would be one more `RegistryView` impl.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::err::Result;

pub trait RegistryView {
    /// Names of the direct child keys of `path`, or `None` if the key
    /// does not exist.
    fn list_children(&self, path: &str) -> Option<Vec<String>>;

    /// The string value named `name` under the key at `path`, if both
    /// the key and the value exist.
    fn get_value(&self, path: &str, name: &str) -> Option<String>;
}

/// One key in an offline registry snapshot.
///
/// Snapshots are JSON trees of the shape
/// `{"values": {"EventMessageFile": "..."}, "children": {"Application": {...}}}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegistryKey {
    #[serde(default)]
    pub values: BTreeMap<String, String>,
    #[serde(default)]
    pub children: BTreeMap<String, RegistryKey>,
}

#[derive(Debug, Clone)]
pub struct SnapshotRegistry {
    root: RegistryKey,
}

impl SnapshotRegistry {
    pub fn new(root: RegistryKey) -> Self {
        SnapshotRegistry { root }
    }

    pub fn from_json(data: &str) -> Result<Self> {
        Ok(SnapshotRegistry {
            root: serde_json::from_str(data)?,
        })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        Self::from_json(&data)
    }

    // Registry names are case-insensitive, snapshot files may use any casing.
    fn lookup(&self, path: &str) -> Option<&RegistryKey> {
        let mut key = &self.root;
        for part in path.split('\\').filter(|p| !p.is_empty()) {
            key = key
                .children
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(part))
                .map(|(_, child)| child)?;
        }
        Some(key)
    }
}

impl RegistryView for SnapshotRegistry {
    fn list_children(&self, path: &str) -> Option<Vec<String>> {
        self.lookup(path)
            .map(|key| key.children.keys().cloned().collect())
    }

    fn get_value(&self, path: &str, name: &str) -> Option<String> {
        self.lookup(path)?
            .values
            .iter()
            .find(|(value_name, _)| value_name.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SNAPSHOT: &str = r#"{
        "children": {
            "SYSTEM": {
                "children": {
                    "EventLog": {
                        "values": {"DisplayName": "Event Log"},
                        "children": {
                            "Application": {},
                            "System": {}
                        }
                    }
                }
            }
        }
    }"#;

    #[test]
    fn lists_children_of_existing_key() {
        let registry = SnapshotRegistry::from_json(SNAPSHOT).unwrap();
        let children = registry.list_children(r"SYSTEM\EventLog").unwrap();
        assert_eq!(children, vec!["Application".to_string(), "System".to_string()]);
    }

    #[test]
    fn missing_key_yields_none() {
        let registry = SnapshotRegistry::from_json(SNAPSHOT).unwrap();
        assert!(registry.list_children(r"SYSTEM\NoSuchKey").is_none());
        assert!(registry.get_value(r"SYSTEM\NoSuchKey", "DisplayName").is_none());
    }

    #[test]
    fn path_and_value_lookups_are_case_insensitive() {
        let registry = SnapshotRegistry::from_json(SNAPSHOT).unwrap();
        assert!(registry.list_children(r"system\eventlog").is_some());
        assert_eq!(
            registry.get_value(r"SYSTEM\EVENTLOG", "displayname"),
            Some("Event Log".to_string())
        );
    }
}
