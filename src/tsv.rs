//! Tab-delimited output document.
//!
//! Rows are accumulated in an ordered in-memory builder scoped to the run
//! and flushed with a single write, so a sink failure never leaves a
//! partially written file behind an earlier successful batch.

use std::fs;
use std::path::Path;

use crate::err::Result;

/// Pipeline A column order.
pub const MESSAGE_HEADER: [&str; 10] = [
    "ChannelName",
    "EventSource",
    "ExportFile",
    "ExportMessageID",
    "ExportMessageIDHex",
    "MessageId",
    "MessageType",
    "FacilityCode",
    "LocaleId",
    "Message",
];

/// Pipeline B column order.
pub const PROVIDER_HEADER: [&str; 10] = [
    "ProviderName",
    "EventId",
    "EventVersion",
    "EventChannel",
    "EventLevel",
    "Keywords",
    "Tasks",
    "OpCodes",
    "EventDescriptionText",
    "EventXmlTemplate",
];

/// Tab-join pre-sanitized fields into one row.
pub fn join_fields<'a>(fields: impl IntoIterator<Item = &'a str>) -> String {
    fields.into_iter().collect::<Vec<_>>().join("\t")
}

#[derive(Debug, Clone)]
pub struct TsvDocument {
    lines: Vec<String>,
}

impl TsvDocument {
    pub fn new(header: &[&str]) -> Self {
        TsvDocument {
            lines: vec![header.join("\t")],
        }
    }

    pub fn push_row(&mut self, row: String) {
        self.lines.push(row);
    }

    /// Data rows written so far (the header is not counted).
    pub fn row_count(&self) -> usize {
        self.lines.len() - 1
    }

    pub fn render(&self) -> String {
        let mut out = self.lines.join("\n");
        out.push('\n');
        out
    }

    /// Write the whole document at once as UTF-8 without a byte-order mark.
    /// Any I/O failure here is fatal to the run.
    pub fn write_to_path(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::write(path, self.render())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_document_is_header_only() {
        let doc = TsvDocument::new(&PROVIDER_HEADER);
        assert_eq!(doc.row_count(), 0);
        assert_eq!(
            doc.render(),
            "ProviderName\tEventId\tEventVersion\tEventChannel\tEventLevel\tKeywords\tTasks\tOpCodes\tEventDescriptionText\tEventXmlTemplate\n"
        );
    }

    #[test]
    fn rows_are_newline_separated_with_trailing_newline() {
        let mut doc = TsvDocument::new(&["A", "B"]);
        doc.push_row(join_fields(["1", "2"]));
        doc.push_row(join_fields(["3", "4"]));

        assert_eq!(doc.row_count(), 2);
        assert_eq!(doc.render(), "A\tB\n1\t2\n3\t4\n");
    }

    #[test]
    fn written_file_has_no_byte_order_mark() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.tsv");

        let doc = TsvDocument::new(&MESSAGE_HEADER);
        doc.write_to_path(&path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"ChannelName\t"));
    }
}
