//! CLI entry point for met_forcing.
//!
//! Converts half-hourly met files into daily (`mate`) or half-hourly
//! (`twoleaf`) forcing files for the canopy model, and reports on input
//! coverage.

use anyhow::Result;
use clap::{Parser, Subcommand};
use met_forcing::aggregation::Scheme;
use met_forcing::aggregation::forcing::{ForcingRequest, generate_forcing};
use met_forcing::aggregation::settings::AggregationSettings;
use met_forcing::config::Config;
use met_forcing::output::{print_json, print_pretty};
use met_forcing::parser::read_met_table;
use met_forcing::stats::Coverage;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "met_forcing")]
#[command(about = "Build canopy model met forcing from half-hourly data", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a half-hourly met file into a forcing file
    Generate {
        /// Whitespace- or comma-delimited half-hourly met file
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Forcing file to write (overwritten)
        #[arg(short, long)]
        output: PathBuf,

        /// Forcing scheme: "mate" (daily) or "twoleaf" (half-hourly)
        #[arg(short, long, default_value = "mate")]
        scheme: Scheme,

        /// Fixed CO2 concentration (ppm) written on every row
        #[arg(long)]
        co2: Option<f64>,

        /// Site name for the file header (defaults to MET_SITE)
        #[arg(long)]
        site: Option<String>,

        /// Author for the file header (defaults to MET_CREATED_BY, then USER)
        #[arg(long)]
        created_by: Option<String>,

        /// Log the run report as JSON
        #[arg(long, default_value_t = false)]
        report_json: bool,
    },
    /// Summarise which days of the year range an input file covers
    Inspect {
        #[arg(value_name = "INPUT")]
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file
    let config = Config::from_env();

    // Logging setup: colored stderr + JSON rolling log file
    let log_dir = Path::new(&config.log_file_path)
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&config.log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("met_forcing.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(
            EnvFilter::try_from_env("RUST_LOG").unwrap_or_else(|_| EnvFilter::new("info")),
        );

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(
            EnvFilter::try_from_env("RUST_LOG_JSON").unwrap_or_else(|_| EnvFilter::new("debug")),
        );

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            input,
            output,
            scheme,
            co2,
            site,
            created_by,
            report_json,
        } => {
            let table = read_met_table(&input)?;
            let settings = AggregationSettings::default();
            let request = ForcingRequest {
                output: &output,
                scheme,
                fixed_co2: co2,
                site: site.as_deref().unwrap_or(&config.site),
                created_by: created_by.as_deref().unwrap_or(&config.created_by),
            };

            let report = generate_forcing(&table, &settings, &request)?;

            info!(
                output = %output.display(),
                scheme = %scheme,
                rows = report.rows_written,
                placeholders = report.placeholder_count(),
                "Forcing generated"
            );
            if report_json {
                print_json(&report)?;
            } else {
                print_pretty(&report);
            }
        }
        Commands::Inspect { input } => {
            let table = read_met_table(&input)?;
            let coverage = Coverage::from_table(&table);

            info!(
                first_year = coverage.first_year,
                last_year = coverage.last_year,
                rows = coverage.rows,
                days_present = coverage.days_present,
                complete_days = coverage.complete_days,
                incomplete_days = coverage.incomplete_days,
                missing_days = coverage.missing_days.len(),
                pct_complete = coverage.pct_complete(),
                "Coverage summary"
            );

            for day in coverage.missing_days.iter().take(20) {
                warn!(year = day.year, doy = day.doy, "Missing day");
            }
            if coverage.missing_days.len() > 20 {
                warn!(
                    more = coverage.missing_days.len() - 20,
                    "Further missing days not listed"
                );
            }
            if !coverage.missing_days.is_empty() {
                warn!("Daily aggregation (scheme mate) will reject this file");
            }
        }
    }

    Ok(())
}
