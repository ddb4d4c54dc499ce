//! Parses dumped message-resource text into discrete message records.
//!
//! Dump output is free text; the only structure is the header marker line
//! (`ID 0x...`) that opens each message block. The parser scans for those
//! markers, decodes the packed ID from each header, and flattens the body
//! lines between markers into one delimiter-safe line.
//!
//! Malformed headers are per-block failures: the block is skipped and
//! reported, the rest of the dump is still parsed.

use log::{debug, info, warn};

use crate::err::{Error, HeaderParseError};
use crate::message_id::PackedMessageId;
use crate::tsv::join_fields;

/// A message block starts at any line beginning with this marker.
pub const HEADER_MARKER: &str = "ID 0x";

/// Context fields supplied by the caller; the dump itself does not know
/// which source referenced the file.
#[derive(Debug, Clone, Copy)]
pub struct MessageContext<'a> {
    pub channel: &'a str,
    pub source: &'a str,
    pub resource_file: &'a str,
}

/// One flattened message definition (Pipeline A output row).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRecord {
    pub channel: String,
    pub source: String,
    pub resource_file: String,
    /// Full packed 32-bit message ID.
    pub message_id: u32,
    /// The hex ID field as it appeared in the dump, lower-cased.
    pub message_id_hex: String,
    /// Developer-assigned message number (low 16 bits of the packed ID).
    pub message_id_low16: u16,
    /// Heuristic label derived from the type nybble; may be empty.
    pub message_type: &'static str,
    pub facility_code: String,
    pub language_code: String,
    /// Single-line body with escape tokens substituted.
    pub message: String,
}

impl MessageRecord {
    /// Tab-joined output row, column order matching
    /// [`crate::tsv::MESSAGE_HEADER`].
    pub fn to_row(&self) -> String {
        join_fields([
            self.channel.as_str(),
            self.source.as_str(),
            self.resource_file.as_str(),
            &self.message_id.to_string(),
            &self.message_id_hex,
            &self.message_id_low16.to_string(),
            self.message_type,
            &self.facility_code,
            &self.language_code,
            &self.message,
        ])
    }
}

#[derive(Debug, Default)]
pub struct DumpParse {
    pub records: Vec<MessageRecord>,
    /// Blocks rejected because of a malformed header line.
    pub skipped: Vec<Error>,
}

#[derive(Debug)]
struct ParsedHeader {
    id: PackedMessageId,
    hex_field: String,
    language: String,
}

/// Split one dump into message records.
///
/// Blocks run from each header marker to the next. The final marker also
/// opens a block (running to end of input) when any lines follow it; a
/// bare trailing marker is the dump's terminator and produces no record.
pub fn parse_dump(ctx: &MessageContext<'_>, lines: &[String]) -> DumpParse {
    let marker_indices: Vec<usize> = lines
        .iter()
        .enumerate()
        .filter(|(_, line)| line.starts_with(HEADER_MARKER))
        .map(|(i, _)| i)
        .collect();

    let mut parse = DumpParse::default();

    if marker_indices.is_empty() {
        info!(
            "no message headers found in dump of `{}`; skipping",
            ctx.resource_file
        );
        return parse;
    }

    for (pos, &start) in marker_indices.iter().enumerate() {
        let end = marker_indices.get(pos + 1).copied().unwrap_or(lines.len());

        if pos + 1 == marker_indices.len() && end == start + 1 {
            debug!(
                "trailing header marker at line {} of `{}` has no body; treating as terminator",
                start + 1,
                ctx.resource_file
            );
            continue;
        }

        match parse_header(&lines[start]) {
            Ok(header) => {
                let body = flatten_body(&lines[start + 1..end]);
                parse.records.push(MessageRecord {
                    channel: ctx.channel.to_string(),
                    source: ctx.source.to_string(),
                    resource_file: ctx.resource_file.to_string(),
                    message_id: header.id.0,
                    message_id_low16: header.id.low16(),
                    message_type: header.id.type_label(),
                    facility_code: header.id.facility_code(),
                    message_id_hex: header.hex_field,
                    language_code: header.language,
                    message: body,
                });
            }
            Err(reason) => {
                warn!(
                    "skipping malformed message block at line {} of `{}`: {reason}",
                    start + 1,
                    ctx.resource_file
                );
                parse.skipped.push(Error::MalformedHeader {
                    line_number: start + 1,
                    reason,
                });
            }
        }
    }

    parse
}

/// Header layout: `ID 0x<8hex> (<decimal>) Language: <code>`.
fn parse_header(line: &str) -> Result<ParsedHeader, HeaderParseError> {
    let tokens: Vec<&str> = line.split(' ').filter(|t| !t.is_empty()).collect();
    if tokens.len() < 5 {
        return Err(HeaderParseError::TooFewTokens {
            found: tokens.len(),
        });
    }

    let hex_field = tokens[1].to_ascii_lowercase();
    if hex_field.len() != 10 || !hex_field.starts_with("0x") {
        return Err(HeaderParseError::BadHexId {
            value: tokens[1].to_string(),
        });
    }
    let hex = u32::from_str_radix(&hex_field[2..], 16).map_err(|_| HeaderParseError::BadHexId {
        value: tokens[1].to_string(),
    })?;

    let decimal_field = tokens[2]
        .trim_start_matches('(')
        .trim_end_matches(')');
    let decimal: u32 = decimal_field
        .parse()
        .map_err(|_| HeaderParseError::BadDecimalId {
            value: tokens[2].to_string(),
        })?;

    if hex != decimal {
        return Err(HeaderParseError::HexDecimalMismatch { hex, decimal });
    }

    Ok(ParsedHeader {
        id: PackedMessageId(hex),
        hex_field,
        language: tokens[4].to_string(),
    })
}

/// Flatten body lines into a single line with escape tokens substituted.
fn flatten_body(lines: &[String]) -> String {
    let mut out = String::new();
    for line in lines {
        out.push_str(&substitute_tokens(line.trim()));
    }
    out
}

fn substitute_tokens(line: &str) -> String {
    let substituted = line
        .replace("%n", "[NL]")
        .replace("%t", "[TAB]")
        .replace("%b", " ")
        .replace("%0", " ")
        .replace("\\n", "[NL]")
        .replace("\\t", "[TAB]");

    // Raw control characters inside a body line would break the TSV row.
    substituted
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}
