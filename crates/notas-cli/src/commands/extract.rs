//! Extract command - read the fields of a single invoice.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::info;

use notas_core::models::columns::CANONICAL_COLUMNS;
use notas_core::report::assemble_with;
use notas_core::{ExtractionRecord, Extractor, PdfSource};

use super::{load_config, load_registry};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input PDF file
    #[arg(required = true)]
    input: PathBuf,

    /// Layout key of the issuing municipality
    #[arg(short, long)]
    layout: String,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Extra template directory
    #[arg(long)]
    templates: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// One-row CSV report
    Csv,
    /// Plain text summary
    Text,
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;
    let registry = load_registry(&config, args.templates.as_deref())?;
    let extractor = Extractor::new(Arc::new(registry), PdfSource::new(config.page.clone()));

    info!("Processing file: {}", args.input.display());
    let record = extractor.extract(&args.input, &args.layout);

    let output = format_record(&record, args.format, &config.extraction.placeholder)?;

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

    info!("Done in {:?}", start.elapsed());

    if !record.status.is_success() {
        anyhow::bail!("{}: {}", args.input.display(), record.status);
    }
    Ok(())
}

fn format_record(
    record: &ExtractionRecord,
    format: OutputFormat,
    placeholder: &str,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(record)?),
        OutputFormat::Csv => {
            let table = assemble_with([record], &CANONICAL_COLUMNS, placeholder);
            let mut buf = Vec::new();
            table.write_csv(&mut buf)?;
            Ok(String::from_utf8(buf)?)
        }
        OutputFormat::Text => Ok(format_record_text(record)),
    }
}

fn format_record_text(record: &ExtractionRecord) -> String {
    let mut output = String::new();

    output.push_str(&format!("Status: {}\n", record.status));
    if let Some(group) = &record.source_group {
        output.push_str(&format!("Group: {}\n", group));
    }
    output.push('\n');

    let width = record.fields.keys().map(|k| k.chars().count()).max().unwrap_or(0);
    for (field, value) in &record.fields {
        let pad = width - field.chars().count();
        output.push_str(&format!("  {}{}  {}\n", field, " ".repeat(pad), value));
    }

    let feed = record.form_feed();
    if !feed.is_complete() && record.status.is_success() {
        output.push_str("\nSome form fields are missing.\n");
    }

    output
}
