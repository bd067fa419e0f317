//! # tabschema CLI entry point
//!
//! Parses command-line arguments, installs the tracing subscriber, opens
//! the schema catalog, and dispatches to the subcommand handlers.

use std::io::{self, BufWriter, Write};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use tabschema_cli::catalog::CatalogArgs;
use tabschema_cli::decode::{run_decode, DecodeArgs};
use tabschema_cli::inspect::{run_fields, run_index, run_sources, FieldsArgs, IndexArgs};

/// Inspect and decode delimited trace data against a schema description.
#[derive(Parser, Debug)]
#[command(name = "tabschema", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(flatten)]
    catalog: CatalogArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List every source: key, file pattern, and field count.
    Sources,

    /// Print the fields of a source as JSON lines.
    Fields(FieldsArgs),

    /// Print the zero-based position of a field.
    Index(IndexArgs),

    /// Decode the data files of a source to JSON arrays.
    Decode(DecodeArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    match run(&cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<u8> {
    let catalog = cli.catalog.open_catalog()?;
    let mut out = BufWriter::new(io::stdout().lock());

    let code = match &cli.command {
        Commands::Sources => run_sources(&catalog, &mut out),
        Commands::Fields(args) => run_fields(args, &catalog, &mut out),
        Commands::Index(args) => run_index(args, &catalog, &mut out),
        Commands::Decode(args) => run_decode(args, &catalog, &mut out),
    }?;
    out.flush()?;
    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn cli_parse_sources() {
        let cli = Cli::try_parse_from(["tabschema", "--schema", "schema.csv", "sources"]).unwrap();
        assert!(matches!(cli.command, Commands::Sources));
        assert_eq!(cli.catalog.schema, Some(PathBuf::from("schema.csv")));
        assert!(cli.catalog.data_root.is_none());
        assert!(!cli.catalog.reject_conflicting_patterns);
    }

    #[test]
    fn cli_parse_fields_and_index() {
        let cli =
            Cli::try_parse_from(["tabschema", "--schema", "s.csv", "fields", "machine_events"]).unwrap();
        if let Commands::Fields(args) = cli.command {
            assert_eq!(args.source, "machine_events");
        } else {
            panic!("expected fields");
        }

        let cli = Cli::try_parse_from([
            "tabschema",
            "--schema",
            "s.csv",
            "index",
            "machine_events",
            "machine ID",
        ])
        .unwrap();
        if let Commands::Index(args) = cli.command {
            assert_eq!(args.source, "machine_events");
            assert_eq!(args.label, "machine ID");
        } else {
            panic!("expected index");
        }
    }

    #[test]
    fn cli_parse_decode_with_options() {
        let cli = Cli::try_parse_from([
            "tabschema",
            "--schema",
            "s.csv",
            "decode",
            "task_usage",
            "--limit",
            "25",
            "--fail-fast",
        ])
        .unwrap();
        if let Commands::Decode(args) = cli.command {
            assert_eq!(args.source, "task_usage");
            assert_eq!(args.limit, Some(25));
            assert!(args.fail_fast);
        } else {
            panic!("expected decode");
        }
    }

    #[test]
    fn cli_parse_global_options_after_subcommand() {
        let cli = Cli::try_parse_from([
            "tabschema",
            "--schema",
            "s.csv",
            "decode",
            "t",
            "--data-root",
            "/srv/trace",
            "--config",
            "tabschema.yaml",
            "--reject-conflicting-patterns",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.catalog.data_root, Some(PathBuf::from("/srv/trace")));
        assert_eq!(cli.catalog.config, Some(PathBuf::from("tabschema.yaml")));
        assert!(cli.catalog.reject_conflicting_patterns);
    }

    #[test]
    fn cli_parse_verbose_levels() {
        for (flag, level) in [("-v", 1), ("-vv", 2), ("-vvv", 3)] {
            let cli = Cli::try_parse_from(["tabschema", flag, "--schema", "s.csv", "sources"]).unwrap();
            assert_eq!(cli.verbose, level);
        }
    }

    #[test]
    fn cli_parse_schema_after_subcommand() {
        let cli =
            Cli::try_parse_from(["tabschema", "decode", "task_usage", "--schema", "s.csv"]).unwrap();
        assert_eq!(cli.catalog.schema, Some(PathBuf::from("s.csv")));
        assert!(matches!(cli.command, Commands::Decode(_)));
    }

    #[test]
    fn cli_without_schema_fails_to_run() {
        let cli = Cli::try_parse_from(["tabschema", "sources"]).unwrap();
        let err = run(&cli).unwrap_err();
        assert!(err.to_string().contains("--schema"));
    }

    #[test]
    fn cli_parse_no_subcommand_errors() {
        assert!(Cli::try_parse_from(["tabschema", "--schema", "s.csv"]).is_err());
    }

    #[test]
    fn cli_parse_invalid_subcommand_errors() {
        assert!(Cli::try_parse_from(["tabschema", "--schema", "s.csv", "nonexistent"]).is_err());
    }

    #[test]
    fn cli_parse_decode_requires_source() {
        assert!(Cli::try_parse_from(["tabschema", "--schema", "s.csv", "decode"]).is_err());
    }
}
