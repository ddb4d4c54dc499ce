//! Flattens provider event definitions into delimiter-safe scalar rows.
//!
//! Every rule applies independently per field; absent values become the
//! documented sentinels so the output schema never has empty cells except
//! `EventVersion`, which is deliberately blank when unspecified.

use crate::provider::{EventDefinition, NamedElement};
use crate::tsv::join_fields;

pub const CHANNEL_SENTINEL: &str = "ETW";
pub const LEVEL_SENTINEL: &str = "UnDefined";
pub const EMPTY_LIST_SENTINEL: &str = "None";
pub const NO_DESCRIPTION: &str = "No Description";
pub const NO_TEMPLATE: &str = "No Event Template";

/// One flattened provider event (Pipeline B output row).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderEventRecord {
    pub provider_name: String,
    pub event_id: u32,
    /// Empty when the manifest does not version the event.
    pub event_version: String,
    pub channel: String,
    pub level: String,
    pub keywords: String,
    pub tasks: String,
    pub opcodes: String,
    pub description: String,
    pub template: String,
}

impl ProviderEventRecord {
    /// Tab-joined output row, column order matching
    /// [`crate::tsv::PROVIDER_HEADER`]. The description is wrapped in
    /// literal quotes to protect embedded characters from spreadsheet
    /// tooling.
    pub fn to_row(&self) -> String {
        join_fields([
            self.provider_name.as_str(),
            &self.event_id.to_string(),
            &self.event_version,
            &self.channel,
            &self.level,
            &self.keywords,
            &self.tasks,
            &self.opcodes,
            &format!("\"{}\"", self.description),
            &self.template,
        ])
    }
}

/// Pure per-event transformation; the caller is responsible for skipping
/// providers with no events.
pub fn normalize_event(provider_name: &str, event: &EventDefinition) -> ProviderEventRecord {
    let channel = match event.log_link.as_deref() {
        Some(log) if !log.is_empty() => log.to_string(),
        _ => CHANNEL_SENTINEL.to_string(),
    };

    let level = event
        .level
        .as_ref()
        .map(|level| level.display().to_string())
        .unwrap_or_else(|| LEVEL_SENTINEL.to_string());

    let description = sanitize_or(&event.description, NO_DESCRIPTION);
    let template = sanitize_or(&event.template, NO_TEMPLATE);

    ProviderEventRecord {
        provider_name: provider_name.to_string(),
        event_id: event.id,
        event_version: event
            .version
            .map(|v| v.to_string())
            .unwrap_or_default(),
        channel,
        level,
        keywords: join_names(&event.keywords),
        tasks: join_names(&event.tasks),
        opcodes: join_names(&event.opcodes),
        description,
        template,
    }
}

/// Semicolon-join of display names; never emits a trailing separator.
fn join_names(elements: &[NamedElement]) -> String {
    if elements.is_empty() {
        return EMPTY_LIST_SENTINEL.to_string();
    }
    elements
        .iter()
        .map(NamedElement::display)
        .collect::<Vec<_>>()
        .join(";")
}

fn sanitize_or(text: &str, sentinel: &str) -> String {
    let sanitized: String = text
        .chars()
        .map(|c| match c {
            '\r' | '\n' | '\t' => ' ',
            other => other,
        })
        .collect();

    if sanitized.trim().is_empty() {
        sentinel.to_string()
    } else {
        sanitized
    }
}
