
use fixtures::*;

use pretty_assertions::assert_eq;

use evtmeta::dumper::ResourceDumper;
use evtmeta::message_parser::{MessageContext, parse_dump};
use evtmeta::normalizer::normalize_event;
use evtmeta::provider::ProviderManifest;
use evtmeta::registry::SnapshotRegistry;
use evtmeta::source_scanner::{ChannelSourceKey, ScanSettings, SourceRegistryScanner};
use evtmeta::tsv::{MESSAGE_HEADER, PROVIDER_HEADER, TsvDocument};

/// Synthetic dumper fed from a fixed line sequence.
struct FakeDumper {
    lines: Vec<String>,
}

impl ResourceDumper for FakeDumper {
    fn dump(&self, _path: &str) -> evtmeta::Result<Vec<String>> {
        Ok(self.lines.clone())
    }
}

#[test]
fn legacy_pipeline_scan_dump_parse_serialize() {
    ensure_env_logger_initialized();

    let registry = SnapshotRegistry::from_json(SINGLE_SOURCE_SNAPSHOT).unwrap();
    let scanner =
        SourceRegistryScanner::with_file_check(&registry, ScanSettings::default(), |_| true);
    let outcome = scanner.scan().unwrap();

    // Scan: one source, one normalized file.
    let key = ChannelSourceKey {
        channel: "Application".to_string(),
        source: "MySvc".to_string(),
    };
    let files = outcome.sources.get(&key).unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].as_str(), r"c:\msgs.dll");

    // Dump + parse: two headers with one body line between them produce
    // exactly one record.
    let dumper = FakeDumper {
        lines: SINGLE_MESSAGE_DUMP.lines().map(str::to_string).collect(),
    };

    let mut doc = TsvDocument::new(&MESSAGE_HEADER);
    for (key, files) in &outcome.sources {
        for file in files {
            let lines = dumper.dump(file.as_str()).unwrap();
            let ctx = MessageContext {
                channel: &key.channel,
                source: &key.source,
                resource_file: file.as_str(),
            };
            let parse = parse_dump(&ctx, &lines);
            assert!(parse.skipped.is_empty());
            for record in parse.records {
                doc.push_row(record.to_row());
            }
        }
    }

    assert_eq!(doc.row_count(), 1);
    assert_eq!(
        doc.render(),
        "ChannelName\tEventSource\tExportFile\tExportMessageID\tExportMessageIDHex\tMessageId\tMessageType\tFacilityCode\tLocaleId\tMessage\n\
         Application\tMySvc\tc:\\msgs.dll\t1073741825\t0x40000001\t1\tInformational\t000\tEnglish\tService started successfully.\n"
    );
}

#[test]
fn provider_pipeline_flattens_nested_collections() {
    ensure_env_logger_initialized();

    let providers: Vec<ProviderManifest> = serde_json::from_str(
        r#"[
            {"name": "Zero-Events"},
            {"name": "Microsoft-Windows-Example", "events": [
                {
                    "id": 1,
                    "version": 0,
                    "level": {"name": "win:Error", "displayName": "Error"},
                    "logLink": "Application",
                    "keywords": [{"name": "k1", "displayName": "First"}, {"name": "k2"}],
                    "opcodes": [{"name": "win:Start", "displayName": "Start"}],
                    "description": "Multi\r\nline",
                    "template": "<Data Name=\"p1\"/>"
                },
                {"id": 2}
            ]}
        ]"#,
    )
    .unwrap();

    let mut doc = TsvDocument::new(&PROVIDER_HEADER);
    for provider in &providers {
        if provider.events.is_empty() {
            continue;
        }
        for event in &provider.events {
            doc.push_row(normalize_event(&provider.name, event).to_row());
        }
    }

    assert_eq!(doc.row_count(), 2);
    let rendered = doc.render();
    let rows: Vec<&str> = rendered.lines().collect();

    assert_eq!(
        rows[1],
        "Microsoft-Windows-Example\t1\t0\tApplication\tError\tFirst;k2\tNone\tStart\t\"Multi  line\"\t<Data Name=\"p1\"/>"
    );
    assert_eq!(
        rows[2],
        "Microsoft-Windows-Example\t2\t\tETW\tUnDefined\tNone\tNone\tNone\t\"No Description\"\tNo Event Template"
    );
}
