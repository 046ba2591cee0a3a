//! Batch processing command for multiple statement files.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use futures_util::stream::{self, StreamExt};
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use penyata_core::acquire::DocumentFormat;
use penyata_core::models::config::PenyataConfig;
use penyata_core::models::record::FinanceRecord;
use penyata_core::pipeline::StatementPipeline;
use penyata_core::statement::rules::months::month_number;

use super::process::{format_record, OutputFormat};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Statement month for every file (default: derived from file names)
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=12))]
    month: Option<u32>,

    /// Statement year for every file (default: derived from file names)
    #[arg(short, long, value_parser = clap::value_parser!(i32).range(2000..=2100))]
    year: Option<i32>,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Number of parallel workers
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of processing a single file.
struct FileResult {
    path: PathBuf,
    record: Option<FinanceRecord>,
    warnings: Vec<String>,
    error: Option<String>,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    // Load configuration
    let config = if let Some(path) = config_path {
        PenyataConfig::from_file(std::path::Path::new(path))?
    } else {
        PenyataConfig::default()
    };

    // Expand glob pattern
    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| DocumentFormat::from_path(p).is_some())
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    // Create output directory if specified
    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let overall_pb = ProgressBar::new(files.len() as u64);
    overall_pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")
            .unwrap()
            .progress_chars("=>-"),
    );

    // Each worker runs an independent pipeline invocation; the pipeline
    // itself holds no mutable state.
    let pipeline = Arc::new(StatementPipeline::with_config(config));

    let mut outcomes = stream::iter(files)
        .map(|path| {
            let pipeline = Arc::clone(&pipeline);
            let pb = overall_pb.clone();
            let month = args.month;
            let year = args.year;

            tokio::task::spawn_blocking(move || {
                let result = process_file(&pipeline, &path, month, year);
                pb.inc(1);
                result
            })
        })
        .buffer_unordered(args.jobs.max(1));

    let mut results = Vec::new();
    while let Some(outcome) = outcomes.next().await {
        let result = outcome?;

        // Fail fast: stop scheduling the remaining files on the first
        // failure unless the caller asked to push through.
        if !args.continue_on_error {
            if let Some(error) = &result.error {
                overall_pb.abandon_with_message("Failed");
                anyhow::bail!("Processing failed for {}: {}", result.path.display(), error);
            }
        }

        results.push(result);
    }

    overall_pb.finish_with_message("Complete");

    // Completion order is nondeterministic; keep reports stable.
    results.sort_by(|a, b| a.path.cmp(&b.path));

    // Write outputs
    let successful: Vec<_> = results.iter().filter(|r| r.record.is_some()).collect();
    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();

    for result in &successful {
        if let (Some(record), Some(output_dir)) = (&result.record, &args.output_dir) {
            let output_name = result
                .path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("penyata");

            let extension = match args.format {
                OutputFormat::Json => "json",
                OutputFormat::Csv => "csv",
                OutputFormat::Text => "txt",
            };

            let output_path = output_dir.join(format!("{}.{}", output_name, extension));
            fs::write(&output_path, format_record(record, args.format)?)?;
            debug!("Wrote output to {}", output_path.display());
        }
    }

    // Generate summary if requested
    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    // Print summary
    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(successful.len()).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for result in &failed {
            println!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

fn process_file(
    pipeline: &StatementPipeline,
    path: &PathBuf,
    month: Option<u32>,
    year: Option<i32>,
) -> FileResult {
    let file_start = Instant::now();

    let derived = derive_period(path);
    let month = month.or(derived.map(|(m, _)| m));
    let year = year.or(derived.map(|(_, y)| y));

    let outcome = match (month, year) {
        (Some(month), Some(year)) => match DocumentFormat::from_path(path) {
            Some(format) => pipeline
                .extract_path(path, format, month, year)
                .map_err(|e| e.to_string()),
            None => Err(format!("unsupported file format: {}", path.display())),
        },
        _ => Err(format!(
            "could not derive statement month and year from '{}', pass --month and --year",
            path.display()
        )),
    };

    let processing_time_ms = file_start.elapsed().as_millis() as u64;

    match outcome {
        Ok(extraction) => FileResult {
            path: path.clone(),
            record: Some(extraction.record),
            warnings: extraction.warnings,
            error: None,
            processing_time_ms,
        },
        Err(error) => FileResult {
            path: path.clone(),
            record: None,
            warnings: Vec::new(),
            error: Some(error),
            processing_time_ms,
        },
    }
}

/// Derive the statement period from a file name such as
/// `penyata_julai_2025.pdf` or `cawangan-7-2025.pdf`.
fn derive_period(path: &PathBuf) -> Option<(u32, i32)> {
    let stem = path.file_stem()?.to_str()?;

    let mut month = None;
    let mut year = None;

    for token in stem.split(|c: char| !c.is_alphanumeric()) {
        if token.is_empty() {
            continue;
        }

        if year.is_none() {
            if let Ok(value) = token.parse::<i32>() {
                if (2000..=2100).contains(&value) {
                    year = Some(value);
                    continue;
                }
            }
        }

        if month.is_none() {
            if let Ok(value) = token.parse::<u32>() {
                if (1..=12).contains(&value) {
                    month = Some(value);
                    continue;
                }
            }
            if let Some(value) = month_number(token) {
                month = Some(value);
            }
        }
    }

    Some((month?, year?))
}

fn write_summary(path: &PathBuf, results: &[FileResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "title",
        "month",
        "year",
        "income_total",
        "expense_total",
        "closing_balance",
        "warnings",
        "processing_time_ms",
        "error",
    ])?;

    for result in results {
        let filename = result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");

        if let Some(record) = &result.record {
            wtr.write_record([
                filename,
                "success",
                &record.title,
                &record.month.to_string(),
                &record.year.to_string(),
                &record.income_total.to_string(),
                &record.expense_total.to_string(),
                &record.closing_balance.to_string(),
                &result.warnings.len().to_string(),
                &result.processing_time_ms.to_string(),
                "",
            ])?;
        } else {
            wtr.write_record([
                filename,
                "error",
                "",
                "",
                "",
                "",
                "",
                "",
                "",
                &result.processing_time_ms.to_string(),
                result.error.as_deref().unwrap_or(""),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}
