//! Command-line interface
//!
//! Runs the resolution engines against a JSON table snapshot and prints the
//! results as JSON.

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use serde::Serialize;
use sheetmeta_core::config::SheetMetaConfig;
use sheetmeta_core::types::{
    ActivePackages, EntityObject, Package, ProvenanceType, ResolutionContext, SheetKind,
};
use std::path::{Path, PathBuf};
use strum::IntoEnumIterator;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::config::load_or_default;
use crate::options::{SelectOptions, select_where};
use crate::registry::EntityObjectRegistry;
use crate::rules::ValidationRuleCompiler;
use crate::snapshot::TableSnapshot;
use crate::visibility::{RowContext, VisibilityResolver};

/// Schema resolution for spreadsheet metadata entry
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file (YAML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Active package, repeatable; overrides the configuration
    #[arg(short, long = "package", global = true)]
    pub packages: Vec<String>,

    /// Provenance mode; overrides the configuration
    #[arg(long, global = true)]
    pub provenance: Option<ProvenanceType>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Columns to show and hide after a discriminator edit
    Visibility {
        /// Table snapshot (JSON object of sheet name to table)
        #[arg(short, long)]
        snapshot: Option<PathBuf>,

        /// Sheet kind (concept, material, process, workflow, execution)
        sheet: SheetKind,

        /// Edited column
        column: String,

        /// New value
        value: String,

        /// Zero-based data row of the edit within the snapshot
        #[arg(short, long)]
        row: Option<usize>,
    },

    /// Compile the validation rule of a column
    Rule {
        #[arg(short, long)]
        snapshot: Option<PathBuf>,

        sheet: SheetKind,

        column: String,
    },

    /// Select option values from a snapshot table
    Options {
        #[arg(short, long)]
        snapshot: PathBuf,

        sheet: SheetKind,

        /// Column to filter on
        filter_column: String,

        /// Value the filter column is compared with
        filter_value: String,

        /// Columns whose values are returned, tab-joined
        #[arg(short = 'o', long = "source", required = true)]
        source_columns: Vec<String>,

        /// Keep rows whose filter column differs instead
        #[arg(long)]
        exclude: bool,
    },

    /// List the registered entity objects
    Registry {
        /// Restrict to one sheet
        sheet: Option<SheetKind>,
    },

    /// Build the registry for every package and provenance combination
    Check,
}

/// Install the global tracing subscriber
///
/// `RUST_LOG` wins over the verbosity flags when set.
pub fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Resolution context from configuration and command-line overrides
pub fn resolution_context(cli: &Cli, config: &SheetMetaConfig) -> anyhow::Result<ResolutionContext> {
    let mut context = config.context()?;
    if !cli.packages.is_empty() {
        context.packages = ActivePackages::from_names(&cli.packages)?;
    }
    if cli.provenance.is_some() {
        context.provenance = cli.provenance;
    }
    Ok(context)
}

/// Execute a parsed command line
pub fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = load_or_default(cli.config.as_deref())
        .with_context(|| format!("loading configuration {:?}", cli.config))?;
    let context = resolution_context(cli, &config)?;
    debug!(?context, "resolution context");

    match &cli.command {
        Command::Visibility {
            snapshot,
            sheet,
            column,
            value,
            row,
        } => {
            let snapshot = load_snapshot(snapshot.as_deref())?;
            let registry = EntityObjectRegistry::build(&context)?;
            let resolver = VisibilityResolver::new(&registry);
            let table = snapshot.table(*sheet);
            let row = row.map(|row| RowContext::new(table, row));
            print_json(&resolver.compute_visibility(*sheet, column, value, row))
        }
        Command::Rule {
            snapshot,
            sheet,
            column,
        } => {
            let snapshot = load_snapshot(snapshot.as_deref())?;
            let compiler = ValidationRuleCompiler::new(&context, &config);
            print_json(&compiler.compile(*sheet, column, &snapshot))
        }
        Command::Options {
            snapshot,
            sheet,
            filter_column,
            filter_value,
            source_columns,
            exclude,
        } => {
            let snapshot = TableSnapshot::load(snapshot)?;
            let options = select_where(
                filter_column,
                filter_value,
                snapshot.table(*sheet),
                &SelectOptions::new(source_columns.as_slice(), !exclude),
            );
            print_json(&options)
        }
        Command::Registry { sheet } => {
            let registry = EntityObjectRegistry::build(&context)?;
            let entities: Vec<&EntityObject> = match sheet {
                Some(sheet) => registry.entities(*sheet).collect(),
                None => SheetKind::all().flat_map(|s| registry.entities(s)).collect(),
            };
            print_json(&entities)
        }
        Command::Check => {
            let reports = check_all_contexts()?;
            print_json(&reports)
        }
    }
}

/// Entity count of one registry build
#[derive(Debug, Serialize)]
pub struct CheckReport {
    pub packages: Vec<Package>,
    pub provenance: Option<ProvenanceType>,
    pub entities: usize,
}

/// Build every package subset under every provenance mode
///
/// # Errors
///
/// Fails on the first registry that does not compose.
pub fn check_all_contexts() -> anyhow::Result<Vec<CheckReport>> {
    let optional: Vec<Package> = Package::iter().filter(|p| *p != Package::Core).collect();
    let provenances = [None, Some(ProvenanceType::Summary), Some(ProvenanceType::Activity)];

    let mut reports = Vec::new();
    for mask in 0..(1_usize << optional.len()) {
        let packages = ActivePackages::new(
            optional
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, p)| *p),
        );
        for provenance in provenances {
            let context = ResolutionContext::new(packages.clone(), provenance);
            let registry = EntityObjectRegistry::build(&context)
                .with_context(|| format!("building registry for {context:?}"))?;
            reports.push(CheckReport {
                packages: packages.iter().collect(),
                provenance,
                entities: registry.len(),
            });
        }
    }
    info!(registries = reports.len(), "all registries compose");
    Ok(reports)
}

fn load_snapshot(path: Option<&Path>) -> anyhow::Result<TableSnapshot> {
    match path {
        Some(path) => TableSnapshot::load(path)
            .with_context(|| format!("loading snapshot {}", path.display())),
        None => Ok(TableSnapshot::default()),
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_visibility_command() {
        let cli = Cli::try_parse_from([
            "sheetmeta",
            "-p",
            "core",
            "-p",
            "CIDC",
            "visibility",
            "concept",
            "concept_type",
            "clinical trial",
            "--row",
            "0",
        ])
        .unwrap();
        assert_eq!(cli.packages, vec!["core", "CIDC"]);
        let Command::Visibility { sheet, row, .. } = cli.command else {
            panic!("expected visibility");
        };
        assert_eq!(sheet, SheetKind::Concept);
        assert_eq!(row, Some(0));
    }

    #[test]
    fn test_overrides_apply() {
        let cli = Cli::try_parse_from(["sheetmeta", "--provenance", "activity", "check"]).unwrap();
        let context = resolution_context(&cli, &SheetMetaConfig::default()).unwrap();
        assert_eq!(context.provenance, Some(ProvenanceType::Activity));
        assert!(context.packages.contains(Package::Core));
    }

    #[test]
    fn test_check_covers_every_combination() {
        let reports = check_all_contexts().unwrap();
        assert_eq!(reports.len(), 4 * 3);
        assert!(reports.iter().all(|r| r.entities > 0));
    }
}
