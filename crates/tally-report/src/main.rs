//! # tally
//!
//! Command-line front-end for the inventory reports.
//!
//! ```text
//! tally summary inventory.json --sort final --format json
//! tally periods history.json --by month
//! tally check inventory.json --strict
//! ```
//!
//! Reports go to stdout, logs to stderr. Flags override `tally.toml` and
//! `TALLY_*` environment variables.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use tally_core::{PeriodGranularity, SortKey};
use tally_report::render::{
    render_inventory_text, render_period_text, render_quality_text, to_json,
};
use tally_report::{
    build_inventory_report, build_period_report, build_quality_report, validate_strict,
    InventorySource, JsonFileSource, OutputFormat, ReportConfig, ReportContext, ReportResult, TextStyle,
};

#[derive(Debug, Parser)]
#[command(
    name = "tally",
    version,
    about = "Inventory count reports",
    long_about = "Compute sales, profit and loss figures from stock count records.",
    after_help = "Examples:\n  tally summary inventory.json\n  tally periods history.json --by month\n  tally check inventory.json"
)]
struct Cli {
    /// Path to tally.toml (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Per-item table and totals for one stock count")]
    Summary {
        file: PathBuf,
        #[arg(long, help = "Item order: name, final or input")]
        sort: Option<SortKey>,
        #[arg(long, help = "Treat counts above the available quantity as zero sold")]
        clamp_sold: bool,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    #[command(about = "Totals per day or month and a grand total")]
    Periods {
        file: PathBuf,
        #[arg(long = "by", help = "Period length: day or month")]
        by: Option<PeriodGranularity>,
        #[arg(long, help = "Treat counts above the available quantity as zero sold")]
        clamp_sold: bool,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    #[command(about = "List data-quality issues; exits 1 when any are found")]
    Check {
        file: PathBuf,
        #[arg(long, help = "Fail on the first record that form validation would reject")]
        strict: bool,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

impl Command {
    fn format(&self) -> OutputFormat {
        match self {
            Command::Summary { format, .. }
            | Command::Periods { format, .. }
            | Command::Check { format, .. } => *format,
        }
    }
}

fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();
    let format = cli.command.format();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            error!(code = ?e.code(), "{}", e);
            match format {
                OutputFormat::Json => match to_json(&e.to_payload()) {
                    Ok(json) => eprintln!("{}", json),
                    Err(_) => eprintln!("error: {}", e),
                },
                OutputFormat::Text => eprintln!("error: {}", e),
            }
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> ReportResult<ExitCode> {
    let mut config = ReportConfig::load(cli.config)?;

    match cli.command {
        Command::Summary {
            file,
            sort,
            clamp_sold,
            format,
        } => {
            config.report.apply_flags(sort, None, clamp_sold);

            let records = JsonFileSource::new(file).load_non_empty()?;
            let report = build_inventory_report(
                ReportContext::from_config(&config),
                &records,
                &config.normalize_options(),
            );

            let output = match format {
                OutputFormat::Json => to_json(&report)?,
                OutputFormat::Text => render_inventory_text(&report, &TextStyle::from(&config.report)),
            };
            print!("{}", with_newline(output));
            Ok(ExitCode::SUCCESS)
        }
        Command::Periods {
            file,
            by,
            clamp_sold,
            format,
        } => {
            config.report.apply_flags(None, by, clamp_sold);

            let records = JsonFileSource::new(file).load_non_empty()?;
            let report = build_period_report(
                ReportContext::from_config(&config),
                &records,
                config.report.period,
                config.report.sold_policy,
            );

            let output = match format {
                OutputFormat::Json => to_json(&report)?,
                OutputFormat::Text => render_period_text(&report, &TextStyle::from(&config.report)),
            };
            print!("{}", with_newline(output));
            Ok(ExitCode::SUCCESS)
        }
        Command::Check {
            file,
            strict,
            format,
        } => {
            let source = JsonFileSource::new(file);
            let records = source.load()?;
            if strict {
                validate_strict(&records)?;
            }
            let report = build_quality_report(ReportContext::from_config(&config), &records);
            info!(source = %source.describe(), issues = report.issues.len(), "Check finished");

            let output = match format {
                OutputFormat::Json => to_json(&report)?,
                OutputFormat::Text => render_quality_text(&report),
            };
            print!("{}", with_newline(output));

            Ok(if report.is_clean() {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1)
            })
        }
    }
}

fn with_newline(mut output: String) -> String {
    if !output.ends_with('\n') {
        output.push('\n');
    }
    output
}

/// Logs to stderr so report output on stdout stays pipeable.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tally=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
