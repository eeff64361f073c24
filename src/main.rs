//! cnc-insight - CNC Machine Operational Insight
//!
//! Command-line collaborator for the report engine: maps a report selector
//! plus a date window to one facade call and serializes the result as a
//! JSON document.
//!
//! # Usage
//!
//! ```bash
//! # Operating-state hours ("working hours")
//! cnc-insight wh -f 2024-03-01 -u 2024-03-07 --data plant_export.jsonl
//!
//! # Daily energy consumption
//! cnc-insight ec -f "2024-03-01 06:00:00" -u "2024-03-01 22:00:00" --data plant_export.jsonl
//!
//! # Alarm incidents
//! cnc-insight alarms -f 2024-03-01 -u 2024-03-07 --data plant_export.jsonl
//! ```
//!
//! # Environment Variables
//!
//! - `CNC_INSIGHT_CONFIG`: path to an engine_config.toml override
//! - `RUST_LOG`: logging level (default: info)

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{error, info};

use cnc_insight::types::{ReportPeriod, REPORT_SCHEMA_VERSION};
use cnc_insight::{EngineConfig, EngineError, JsonlSource, ReportService};

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "cnc-insight")]
#[command(about = "CNC Machine Operational Insight - state, alarm and energy reports")]
#[command(version)]
struct CliArgs {
    /// Report to compute
    #[arg(value_enum)]
    report: ReportKind,

    /// Start date (YYYY-MM-DD or "YYYY-MM-DD HH:MM:SS", UTC)
    #[arg(short = 'f', long)]
    from_date: String,

    /// End date (YYYY-MM-DD or "YYYY-MM-DD HH:MM:SS", UTC)
    #[arg(short = 'u', long)]
    until_date: String,

    /// Path to the plant event-log export (one JSON event per line)
    #[arg(long, value_name = "PATH")]
    data: PathBuf,

    /// Engine config TOML (overrides the standard search order)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Also write the JSON response document to this file
    #[arg(short = 'o', long, value_name = "PATH")]
    output: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ReportKind {
    /// Working hours: time spent per operating state
    Wh,
    /// Energy consumption: kWh per day
    Ec,
    /// Alarm incidents per code
    Alarms,
}

// ============================================================================
// Response envelope
// ============================================================================

/// The document handed to the presentation layer: a stable wrapper around
/// one report payload.
#[derive(Debug, Serialize)]
struct Envelope<T: Serialize> {
    status: &'static str,
    schema_version: u32,
    period: ReportPeriod,
    data: T,
}

fn render<T: Serialize>(period: ReportPeriod, data: T) -> Result<String> {
    let envelope = Envelope {
        status: "ok",
        schema_version: REPORT_SCHEMA_VERSION,
        period,
        data,
    };
    serde_json::to_string_pretty(&envelope).context("Failed to serialize response document")
}

// ============================================================================
// Entry point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();

    let config = match &args.config {
        Some(path) => EngineConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => EngineConfig::load(),
    };

    let source = JsonlSource::open(&args.data)
        .with_context(|| format!("Failed to open event log {}", args.data.display()))?;
    let service = ReportService::new(source, config);

    info!(
        report = ?args.report,
        from = %args.from_date,
        until = %args.until_date,
        "Computing report"
    );

    let document = match run_report(&service, &args).await {
        Ok(document) => document,
        Err(e) => {
            error!(error = %e, "Report failed");
            eprintln!("error: {e:#}");
            // InvalidInput and DataSourceUnavailable carry distinct exit
            // codes for scripting; anything else is a generic failure.
            let code = e
                .downcast_ref::<EngineError>()
                .map_or(1, EngineError::exit_code);
            std::process::exit(code);
        }
    };

    println!("{document}");

    if let Some(path) = &args.output {
        std::fs::write(path, &document)
            .with_context(|| format!("Failed to write response to {}", path.display()))?;
        info!(path = %path.display(), "Response document written");
    }

    Ok(())
}

/// Dispatch one facade call and serialize its envelope.
async fn run_report(service: &ReportService<JsonlSource>, args: &CliArgs) -> Result<String> {
    let (from, until) = (&args.from_date, &args.until_date);
    match args.report {
        ReportKind::Wh => {
            let report = service.state_times(from, until).await?;
            render(report.period.clone(), report)
        }
        ReportKind::Ec => {
            let report = service.energy_consumption(from, until).await?;
            render(report.period.clone(), report)
        }
        ReportKind::Alarms => {
            let report = service.machine_alarms(from, until).await?;
            render(report.period.clone(), report)
        }
    }
}
