use std::path::PathBuf;
use std::process::exit;

use anyhow::{Context, Result, bail};
use clap::{Arg, ArgAction, ArgMatches, Command};
use dialoguer::Confirm;
use indoc::indoc;
use log::{info, warn};
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};

use evtmeta::dumper::{ExternalDumper, ResourceDumper};
use evtmeta::message_parser::{MessageContext, parse_dump};
use evtmeta::normalizer::normalize_event;
use evtmeta::provider::{ManifestFile, ProviderEnumerator};
use evtmeta::registry::SnapshotRegistry;
use evtmeta::source_scanner::{ScanSettings, SourceRegistryScanner};
use evtmeta::tsv::{MESSAGE_HEADER, PROVIDER_HEADER, TsvDocument};

fn cli() -> Command {
    Command::new("evtmeta_dump")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Export Windows event-definition metadata to tab-delimited files")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .action(ArgAction::Count)
                .global(true)
                .help("Verbosity level (-v info, -vv debug, -vvv trace)"),
        )
        .subcommand(
            Command::new("legacy-sources")
                .about("Export message definitions of registry-based event sources")
                .long_about(indoc!(
                    r#"
                    Export message definitions of registry-based event sources.

                    Walks the EventLog registry hierarchy (from an offline JSON
                    snapshot), dumps each referenced message resource file through
                    the external dumper, and writes one row per message definition.
                "#
                ))
                .arg(
                    Arg::new("registry-json")
                        .long("registry-json")
                        .required(true)
                        .value_name("PATH")
                        .help("Offline JSON snapshot of the registry hierarchy"),
                )
                .arg(
                    Arg::new("dumper")
                        .long("dumper")
                        .required(true)
                        .value_name("PATH")
                        .help("External message-dump executable (must exist; checked before any work)"),
                )
                .arg(
                    Arg::new("list-files")
                        .long("list-files")
                        .action(ArgAction::SetTrue)
                        .help("Only print the deduplicated resource-file list, do not dump anything"),
                )
                .arg(output_arg())
                .arg(no_confirm_overwrite_arg()),
        )
        .subcommand(
            Command::new("providers")
                .about("Export event metadata of manifest-based providers")
                .long_about(indoc!(
                    r#"
                    Export event metadata of manifest-based providers.

                    Reads a JSON provider dump and writes one row per
                    (provider, event-definition) pair. Providers without any
                    event definitions are skipped.
                "#
                ))
                .arg(
                    Arg::new("manifest-json")
                        .long("manifest-json")
                        .required(true)
                        .value_name("PATH")
                        .help("JSON provider dump (array of provider objects)"),
                )
                .arg(output_arg())
                .arg(no_confirm_overwrite_arg()),
        )
}

fn output_arg() -> Arg {
    Arg::new("output")
        .long("output")
        .short('f')
        .value_name("PATH")
        .help("Output TSV path (defaults to a per-subcommand filename in the current directory)")
}

fn no_confirm_overwrite_arg() -> Arg {
    Arg::new("no-confirm-overwrite")
        .long("no-confirm-overwrite")
        .action(ArgAction::SetTrue)
        .help("Overwrite an existing output file without asking")
}

fn init_logging(matches: &ArgMatches) {
    let filter = match matches.get_count("verbose") {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    if TermLogger::init(
        filter,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )
    .is_err()
    {
        eprintln!("failed to initialize logging");
    }
}

fn prepare_output_path(matches: &ArgMatches, default_name: &str) -> Result<PathBuf> {
    let path = matches
        .get_one::<String>("output")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(default_name));

    if path.is_dir() {
        bail!(
            "there is a directory at `{}`, refusing to overwrite",
            path.display()
        );
    }

    if path.exists() && !matches.get_flag("no-confirm-overwrite") {
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "`{}` already exists, overwrite?",
                path.display()
            ))
            .interact()
            .unwrap_or(false);

        if !confirmed {
            bail!("not overwriting `{}`", path.display());
        }
    }

    Ok(path)
}

fn run_legacy_sources(matches: &ArgMatches) -> Result<()> {
    // The dumper must be present before any scanning starts.
    let dumper_path = matches.get_one::<String>("dumper").expect("required argument");
    let dumper = ExternalDumper::locate(dumper_path)?;

    let snapshot_path = matches
        .get_one::<String>("registry-json")
        .expect("required argument");
    let registry = SnapshotRegistry::from_path(snapshot_path)
        .with_context(|| format!("failed to load registry snapshot `{snapshot_path}`"))?;

    let scanner = SourceRegistryScanner::new(&registry, ScanSettings::default());
    let outcome = scanner.scan()?;

    if matches.get_flag("list-files") {
        for file in &outcome.all_files {
            println!("{file}");
        }
        return Ok(());
    }

    let output = prepare_output_path(matches, "eventlog_messages.tsv")?;

    let mut doc = TsvDocument::new(&MESSAGE_HEADER);
    let mut dumped_files = 0usize;
    let mut skipped_blocks = 0usize;

    for (key, files) in &outcome.sources {
        for file in files {
            let lines = match dumper.dump(file.as_str()) {
                Ok(lines) => lines,
                Err(e) => {
                    warn!("{e}");
                    continue;
                }
            };
            dumped_files += 1;

            let ctx = MessageContext {
                channel: &key.channel,
                source: &key.source,
                resource_file: file.as_str(),
            };
            let parse = parse_dump(&ctx, &lines);
            skipped_blocks += parse.skipped.len();
            for record in parse.records {
                doc.push_row(record.to_row());
            }
        }
    }

    info!(
        "scanned {} sources, dumped {} files, collected {} records, skipped {} malformed blocks",
        outcome.sources.len(),
        dumped_files,
        doc.row_count(),
        skipped_blocks
    );

    doc.write_to_path(&output)
        .with_context(|| format!("failed to write output file `{}`", output.display()))?;
    Ok(())
}

fn run_providers(matches: &ArgMatches) -> Result<()> {
    let manifest_path = matches
        .get_one::<String>("manifest-json")
        .expect("required argument");
    let enumerator = ManifestFile::new(manifest_path);
    let providers = enumerator
        .list_providers()
        .with_context(|| format!("failed to load provider dump `{manifest_path}`"))?;

    let output = prepare_output_path(matches, "provider_events.tsv")?;

    let mut doc = TsvDocument::new(&PROVIDER_HEADER);
    for provider in &providers {
        if provider.events.is_empty() {
            info!("provider `{}` defines no events; skipping", provider.name);
            continue;
        }
        for event in &provider.events {
            doc.push_row(normalize_event(&provider.name, event).to_row());
        }
    }

    info!(
        "flattened {} events from {} providers",
        doc.row_count(),
        providers.len()
    );

    doc.write_to_path(&output)
        .with_context(|| format!("failed to write output file `{}`", output.display()))?;
    Ok(())
}

fn main() {
    let matches = cli().get_matches();
    init_logging(&matches);

    let result = match matches.subcommand() {
        Some(("legacy-sources", sub)) => run_legacy_sources(sub),
        Some(("providers", sub)) => run_providers(sub),
        _ => unreachable!("subcommand is required"),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        exit(1);
    }
}
