//! Process command - extract a record from a single statement file.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use penyata_core::acquire::DocumentFormat;
use penyata_core::models::config::PenyataConfig;
use penyata_core::models::record::FinanceRecord;
use penyata_core::pipeline::StatementPipeline;
use penyata_core::statement::rules::format_amount;

/// Largest statement document accepted, in bytes.
const MAX_DOCUMENT_BYTES: u64 = 10 * 1024 * 1024;

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file (PDF statement)
    #[arg(required = true)]
    input: PathBuf,

    /// Statement month (1-12)
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=12))]
    month: u32,

    /// Statement year
    #[arg(short, long, value_parser = clap::value_parser!(i32).range(2000..=2100))]
    year: i32,

    /// Branch name for the record title
    #[arg(short, long)]
    branch: Option<String>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Show extraction warnings
    #[arg(long)]
    show_warnings: bool,

    /// Validate extracted data
    #[arg(long)]
    validate: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    // Load configuration
    let mut config = if let Some(path) = config_path {
        PenyataConfig::from_file(Path::new(path))?
    } else {
        PenyataConfig::default()
    };

    if let Some(branch) = &args.branch {
        config.extraction.branch_name = branch.clone();
    }

    // Check input file exists
    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    // Determine file type
    let extension = args
        .input
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let format = DocumentFormat::from_extension(&extension)
        .ok_or_else(|| anyhow::anyhow!("Unsupported file format: {}", extension))?;

    let size = fs::metadata(&args.input)?.len();
    if size > MAX_DOCUMENT_BYTES {
        anyhow::bail!(
            "File exceeds the 10 MB limit: {} is {} bytes",
            args.input.display(),
            size
        );
    }

    info!("Processing file: {}", args.input.display());

    // Create progress bar
    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {msg}")
            .unwrap()
            .progress_chars("##-"),
    );

    pb.set_message("Acquiring text...");
    pb.set_position(20);

    let pipeline = StatementPipeline::with_config(config);
    let result = pipeline.extract_path(&args.input, format, args.month, args.year)?;

    pb.set_message("Assembling record...");
    pb.set_position(90);
    pb.finish_with_message("Done");

    // Validate if requested
    if args.validate {
        let issues = result.record.validate();
        if !issues.is_empty() {
            eprintln!("{}", style("Validation issues:").yellow());
            for issue in &issues {
                eprintln!("  - {}", issue);
            }
        }
    }

    if args.show_warnings && !result.warnings.is_empty() {
        eprintln!("{}", style("Extraction warnings:").yellow());
        for warning in &result.warnings {
            eprintln!("  - {}", warning);
        }
    }

    // Format output
    let output = format_record(&result.record, args.format)?;

    // Write output
    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

pub(crate) fn format_record(record: &FinanceRecord, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string(record)?),
        OutputFormat::Csv => format_csv(record),
        OutputFormat::Text => Ok(format_text(record)),
    }
}

fn format_csv(record: &FinanceRecord) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    // Write header
    wtr.write_record([
        "title",
        "month",
        "year",
        "income_total",
        "expense_total",
        "cash_on_hand",
        "bank_balance",
        "closing_balance",
        "income_items",
        "expense_items",
    ])?;

    // Write data
    wtr.write_record([
        &record.title,
        &record.month.to_string(),
        &record.year.to_string(),
        &record.income_total.to_string(),
        &record.expense_total.to_string(),
        &record.details.summary.cash_on_hand.to_string(),
        &record.details.summary.bank_balance.to_string(),
        &record.closing_balance.to_string(),
        &record.details.income_items.len().to_string(),
        &record.details.expense_items.len().to_string(),
    ])?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(record: &FinanceRecord) -> String {
    let mut output = String::new();

    output.push_str(&format!("{}\n", record.title));
    output.push_str(&format!("Period: {}/{}\n", record.month, record.year));
    output.push('\n');

    output.push_str("Income:\n");
    for item in &record.details.income_items {
        output.push_str(&format!(
            "  {}  {}  {}\n",
            item.date,
            item.description,
            format_amount(item.amount)
        ));
    }
    output.push_str(&format!(
        "  Total: {}\n",
        format_amount(record.income_total)
    ));
    output.push('\n');

    output.push_str("Expenses:\n");
    for item in &record.details.expense_items {
        output.push_str(&format!(
            "  {}  {}  {}\n",
            item.date,
            item.description,
            format_amount(item.amount)
        ));
    }
    output.push_str(&format!(
        "  Total: {}\n",
        format_amount(record.expense_total)
    ));
    output.push('\n');

    output.push_str("Balances:\n");
    output.push_str(&format!(
        "  Cash on hand: {}\n",
        format_amount(record.details.summary.cash_on_hand)
    ));
    output.push_str(&format!(
        "  Bank balance: {}\n",
        format_amount(record.details.summary.bank_balance)
    ));
    output.push_str(&format!(
        "  Closing:      {}\n",
        format_amount(record.closing_balance)
    ));

    output
}
