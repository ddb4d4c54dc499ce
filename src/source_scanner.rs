//! Enumerates legacy event sources and their message resource files.
//!
//! Walks `channel -> source` keys under the EventLog registry root,
//! collects the allow-listed `*MessageFile` values, and builds a per-source
//! deduplicated file list plus a global one. Paths that cannot be verified
//! on disk are dropped with a warning; only a missing root is fatal.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use log::{debug, info, warn};

use crate::err::{Error, Result};
use crate::registry::RegistryView;

pub const EVENTLOG_ROOT: &str = r"SYSTEM\CurrentControlSet\Services\EventLog";

pub const MESSAGE_FILE_VALUES: [&str; 3] = [
    "EventMessageFile",
    "ParameterMessageFile",
    "CategoryMessageFile",
];

/// Identity of one legacy event source: the channel it registers under
/// plus its own name. Structural equality avoids the delimiter-collision
/// bugs of a concatenated string key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChannelSourceKey {
    pub channel: String,
    pub source: String,
}

impl fmt::Display for ChannelSourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.channel, self.source)
    }
}

/// A normalized (trimmed, lower-cased) message resource file path.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResourceFileReference(String);

impl ResourceFileReference {
    pub fn normalize(raw: &str) -> Self {
        ResourceFileReference(raw.trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ResourceFileReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone)]
pub struct ScanSettings {
    pub root: String,
    pub value_names: Vec<String>,
}

impl Default for ScanSettings {
    fn default() -> Self {
        ScanSettings {
            root: EVENTLOG_ROOT.to_string(),
            value_names: MESSAGE_FILE_VALUES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[derive(Debug, Default)]
pub struct ScanOutcome {
    /// Resource files per source, in discovery order within each source.
    /// A `BTreeMap` keeps source iteration stable across runs.
    pub sources: BTreeMap<ChannelSourceKey, Vec<ResourceFileReference>>,
    /// Every distinct resource file seen across all sources, in first-seen order.
    pub all_files: Vec<ResourceFileReference>,
}

type FileSet = hashbrown::HashSet<ResourceFileReference, ahash::RandomState>;

pub struct SourceRegistryScanner<'a, R: RegistryView> {
    registry: &'a R,
    settings: ScanSettings,
    file_check: Box<dyn Fn(&str) -> bool + 'a>,
}

impl<'a, R: RegistryView> SourceRegistryScanner<'a, R> {
    /// Scanner with the real on-disk existence check.
    pub fn new(registry: &'a R, settings: ScanSettings) -> Self {
        Self::with_file_check(registry, settings, |path| Path::new(path).exists())
    }

    /// Scanner with an injected existence check, for tests and offline
    /// snapshots taken on another machine.
    pub fn with_file_check(
        registry: &'a R,
        settings: ScanSettings,
        file_check: impl Fn(&str) -> bool + 'a,
    ) -> Self {
        SourceRegistryScanner {
            registry,
            settings,
            file_check: Box::new(file_check),
        }
    }

    pub fn scan(&self) -> Result<ScanOutcome> {
        let channels = self
            .registry
            .list_children(&self.settings.root)
            .ok_or_else(|| Error::MissingRegistryRoot {
                path: self.settings.root.clone(),
            })?;

        let mut outcome = ScanOutcome::default();
        let mut global_seen = FileSet::default();

        for channel in channels {
            let channel_path = format!("{}\\{}", self.settings.root, channel);
            let Some(source_names) = self.registry.list_children(&channel_path) else {
                warn!("channel key `{channel_path}` vanished during scan; skipping");
                continue;
            };

            for source in source_names {
                let key = ChannelSourceKey {
                    channel: channel.clone(),
                    source: source.clone(),
                };
                let source_path = format!("{channel_path}\\{source}");
                let mut per_source: Vec<ResourceFileReference> = Vec::new();

                for value_name in &self.settings.value_names {
                    let Some(raw) = self.registry.get_value(&source_path, value_name) else {
                        continue;
                    };

                    // A single value may carry several paths separated by `;`.
                    for part in raw.split(';') {
                        let reference = ResourceFileReference::normalize(part);
                        if reference.is_empty() {
                            continue;
                        }
                        if !(self.file_check)(reference.as_str()) {
                            warn!("resource file `{reference}` referenced by {key} does not exist; skipping");
                            continue;
                        }
                        if per_source.contains(&reference) {
                            continue;
                        }
                        if global_seen.insert(reference.clone()) {
                            outcome.all_files.push(reference.clone());
                        }
                        per_source.push(reference);
                    }
                }

                if per_source.is_empty() {
                    debug!("source {key} references no verifiable resource files");
                }
                outcome.sources.insert(key, per_source);
            }
        }

        info!(
            "scanned {} sources, {} distinct resource files",
            outcome.sources.len(),
            outcome.all_files.len()
        );
        Ok(outcome)
    }
}
