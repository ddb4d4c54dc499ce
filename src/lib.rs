//! Extracts event-definition metadata from the two Windows event-logging
//! subsystems and serializes it into flat tab-delimited records.
//!
//! Pipeline A walks the legacy registry-based event source model: sources
//! are enumerated from a key-value hierarchy, their message resource files
//! are dumped through an external tool, and the free-text dump is parsed
//! into discrete message records ([`message_parser`]).
//!
//! Pipeline B flattens manifest-based provider event definitions into the
//! same kind of delimiter-safe rows ([`normalizer`]).
//!
//! Both pipelines share the [`tsv`] output document. The environment
//! (registry, dumper, provider enumeration) is injected through traits so
//! every stage is testable with synthetic data.

pub mod dumper;
pub mod err;
pub mod message_id;
pub mod message_parser;
pub mod normalizer;
pub mod provider;
pub mod registry;
pub mod source_scanner;
pub mod tsv;

pub use err::{Error, HeaderParseError, Result};

pub use dumper::{ExternalDumper, ResourceDumper};
pub use message_id::PackedMessageId;
pub use message_parser::{DumpParse, MessageContext, MessageRecord, parse_dump};
pub use normalizer::{ProviderEventRecord, normalize_event};
pub use provider::{EventDefinition, ManifestFile, NamedElement, ProviderEnumerator, ProviderManifest};
pub use registry::{RegistryView, SnapshotRegistry};
pub use source_scanner::{
    ChannelSourceKey, ResourceFileReference, ScanOutcome, ScanSettings, SourceRegistryScanner,
};
pub use tsv::{MESSAGE_HEADER, PROVIDER_HEADER, TsvDocument};
