//! attar CLI - Report Export Engine
//!
//! Turns report JSON from the reporting backend into formatted XLSX
//! workbooks.
//!
//! Exit codes: `0` exported, `2` nothing to export, `1` failure.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use attar_core::{ExportConfig, FilterContext, ReportKind, ReportPayload};
use attar_export::{sheet_names, DirectorySink, ExportOutcome, Exporter, TracingNotifier};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "attar")]
#[command(author, version, about = "Report export engine for attar retail", long_about = None)]
struct Cli {
    /// Verbose output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Export configuration file (TOML)
    #[arg(short, long, global = true, env = "ATTAR_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export a report payload to an XLSX workbook
    Export {
        /// Report type (inventory, sales, purchase, category, trending, daily-sales)
        #[arg(value_name = "KIND", value_parser = parse_kind)]
        kind: ReportKind,

        /// Report JSON file, or `-` for stdin
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Directory the workbook is written to
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// Currency symbol, overriding the config file
        #[arg(long)]
        currency: Option<String>,

        /// Print the export outcome as JSON
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        filters: FilterArgs,
    },

    /// List the sheets of every report type, or of one with headers when a
    /// payload is given
    Sheets {
        #[arg(value_name = "KIND", value_parser = parse_kind)]
        kind: Option<ReportKind>,

        /// Report JSON file used to resolve column headers
        #[arg(value_name = "FILE")]
        input: Option<PathBuf>,
    },
}

#[derive(Args, Debug, Default)]
struct FilterArgs {
    /// Reference date for expiry and stock projections (default: today)
    #[arg(long, value_name = "DATE")]
    as_of: Option<NaiveDate>,

    /// Named period (daily, weekly, monthly, yearly)
    #[arg(long)]
    period: Option<String>,

    /// Start of the reporting window
    #[arg(long, value_name = "DATE", requires = "to")]
    from: Option<NaiveDate>,

    /// End of the reporting window
    #[arg(long, value_name = "DATE", requires = "from")]
    to: Option<NaiveDate>,

    /// Business day of a daily sales report
    #[arg(long, value_name = "DATE")]
    date: Option<NaiveDate>,

    /// Only records in this category
    #[arg(long)]
    category: Option<String>,

    /// Only records matching this text
    #[arg(long)]
    search: Option<String>,

    /// Only invoices paid this way
    #[arg(long)]
    payment_method: Option<String>,
}

impl FilterArgs {
    fn into_context(self) -> FilterContext {
        let as_of = self
            .as_of
            .unwrap_or_else(|| chrono::Local::now().date_naive());
        let mut filters = FilterContext::new(as_of);
        if let Some(period) = self.period {
            filters = filters.period(period);
        }
        if let (Some(from), Some(to)) = (self.from, self.to) {
            filters = filters.range(from, to);
        }
        if let Some(date) = self.date {
            filters = filters.date(date);
        }
        if let Some(category) = self.category {
            filters = filters.category(category);
        }
        if let Some(search) = self.search {
            filters = filters.search(search);
        }
        if let Some(method) = self.payment_method {
            filters = filters.payment_method(method);
        }
        filters
    }
}

fn parse_kind(value: &str) -> Result<ReportKind, String> {
    value.parse().map_err(|e: attar_core::ExportError| e.to_string())
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<ExportConfig> {
    let Some(path) = path else {
        return Ok(ExportConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let config: ExportConfig =
        toml::from_str(&text).with_context(|| format!("Invalid config {}", path.display()))?;
    tracing::debug!(path = %path.display(), "loaded export config");
    Ok(config)
}

fn read_payload(kind: ReportKind, input: &Path) -> Result<ReportPayload> {
    let json = if input == Path::new("-") {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read report from stdin")?;
        buffer
    } else {
        std::fs::read_to_string(input)
            .with_context(|| format!("Failed to read {}", input.display()))?
    };
    ReportPayload::from_json(kind, &json)
        .with_context(|| format!("Invalid {kind} report in {}", input.display()))
}

fn cmd_export(
    config: ExportConfig,
    kind: ReportKind,
    input: &Path,
    output: PathBuf,
    json: bool,
    filters: FilterArgs,
) -> Result<ExitCode> {
    let payload = read_payload(kind, input)?;
    let filters = filters.into_context();
    let exporter = Exporter::new(DirectorySink::new(output), TracingNotifier).config(config);

    let outcome = exporter.export(&payload, &filters);
    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    }
    let code = match &outcome {
        ExportOutcome::Exported(receipt) => {
            if !json {
                println!("{}", receipt.path.display());
                for sheet in &receipt.sheets {
                    println!("  {} ({} rows)", sheet.name, sheet.rows);
                }
            }
            0
        }
        ExportOutcome::NothingToExport => {
            if !json {
                eprintln!("No {} data available to export", kind.noun());
            }
            2
        }
        ExportOutcome::Failed(reason) => {
            if !json {
                eprintln!("Export failed: {reason}");
            }
            1
        }
    };
    Ok(ExitCode::from(code))
}

fn cmd_sheets(
    config: ExportConfig,
    kind: Option<ReportKind>,
    input: Option<&Path>,
) -> Result<ExitCode> {
    let Some(kind) = kind else {
        for kind in ReportKind::ALL {
            println!("{kind}");
            for name in sheet_names(kind) {
                println!("  {name}");
            }
        }
        return Ok(ExitCode::SUCCESS);
    };
    let Some(input) = input else {
        for name in sheet_names(kind) {
            println!("{name}");
        }
        return Ok(ExitCode::SUCCESS);
    };

    let payload = read_payload(kind, input)?;
    let filters = FilterArgs::default().into_context();
    let exporter = Exporter::new(attar_export::MemorySink::new(), TracingNotifier).config(config);
    for spec in exporter.preview(&payload, &filters) {
        println!("{}", spec.name());
        println!("  {}", spec.sheet.headers().join(" | "));
    }
    Ok(ExitCode::SUCCESS)
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config = load_config(cli.config.as_deref())?;
    match cli.command {
        Commands::Export {
            kind,
            input,
            output,
            currency,
            json,
            filters,
        } => {
            let config = match currency {
                Some(symbol) => config.currency(symbol),
                None => config,
            };
            cmd_export(config, kind, &input, output, json, filters)
        }
        Commands::Sheets { kind, input } => cmd_sheets(config, kind, input.as_deref()),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
