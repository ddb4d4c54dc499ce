//! Manifest-based provider metadata model.
//!
//! Provider enumeration is a platform collaborator, so it is expressed as
//! a trait. The shipped implementation reads a JSON provider dump (one
//! array of provider objects), which is how metadata captured on a live
//! machine gets analyzed offline.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::err::Result;

/// A keyword/task/opcode/level entry. Joins prefer the display name and
/// fall back to the symbolic name.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamedElement {
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

impl NamedElement {
    pub fn display(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }
}

/// One event definition from a provider manifest.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDefinition {
    pub id: u32,
    #[serde(default)]
    pub version: Option<u8>,
    #[serde(default)]
    pub level: Option<NamedElement>,
    /// Destination log name; absent for provider-only (ETW) events.
    #[serde(default)]
    pub log_link: Option<String>,
    #[serde(default)]
    pub keywords: Vec<NamedElement>,
    #[serde(default)]
    pub tasks: Vec<NamedElement>,
    #[serde(default)]
    pub opcodes: Vec<NamedElement>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub template: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderManifest {
    pub name: String,
    #[serde(default)]
    pub events: Vec<EventDefinition>,
}

pub trait ProviderEnumerator {
    fn list_providers(&self) -> Result<Vec<ProviderManifest>>;
}

/// Enumerator backed by a JSON provider dump on disk.
#[derive(Debug, Clone)]
pub struct ManifestFile {
    path: PathBuf,
}

impl ManifestFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        ManifestFile { path: path.into() }
    }
}

impl ProviderEnumerator for ManifestFile {
    fn list_providers(&self) -> Result<Vec<ProviderManifest>> {
        let data = fs::read_to_string(Path::new(&self.path))?;
        Ok(serde_json::from_str(&data)?)
    }
}
