//! Inspect command - show how each rule of a layout resolves on a document.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use console::style;

use notas_core::extraction::RuleTrace;
use notas_core::{Extractor, PdfSource, Rect};

use super::{load_config, load_registry};

/// Arguments for the inspect command.
#[derive(Args)]
pub struct InspectArgs {
    /// Input PDF file
    #[arg(required = true)]
    input: PathBuf,

    /// Layout key of the issuing municipality
    #[arg(short, long)]
    layout: String,

    /// Print traces as JSON
    #[arg(long)]
    json: bool,

    /// Extra template directory
    #[arg(long)]
    templates: Option<PathBuf>,
}

pub async fn run(args: InspectArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let registry = load_registry(&config, args.templates.as_deref())?;
    let extractor = Extractor::new(Arc::new(registry), PdfSource::new(config.page.clone()));

    let traces = extractor.inspect(&args.input, &args.layout)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&traces)?);
        return Ok(());
    }

    for trace in &traces {
        print_trace(trace);
    }
    Ok(())
}

fn print_trace(trace: &RuleTrace) {
    let marker = if trace.value.is_some() {
        style("✓").green()
    } else {
        style("✗").red()
    };
    println!("{} {}", marker, style(&trace.field).bold());

    println!("    anchor     {}", rect_or_dash(trace.anchor.as_ref()));
    if trace.search_region.is_some() {
        println!("    search     {}", rect_or_dash(trace.search_region.as_ref()));
        println!("    secondary  {}", rect_or_dash(trace.secondary.as_ref()));
    }
    println!("    capture    {}", rect_or_dash(trace.capture.as_ref()));
    if let Some(raw) = &trace.raw_text {
        println!("    raw        {:?}", raw);
    }
    println!(
        "    value      {}",
        trace.value.as_deref().unwrap_or("-")
    );
    println!();
}

fn rect_or_dash(rect: Option<&Rect>) -> String {
    rect.map(ToString::to_string)
        .unwrap_or_else(|| "-".to_string())
}
