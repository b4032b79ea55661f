//! Batch command - extract a folder tree of invoices into one report.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::{glob_with, MatchOptions, Pattern};
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use notas_core::models::columns::CANONICAL_COLUMNS;
use notas_core::models::config::NotasConfig;
use notas_core::report::assemble_with;
use notas_core::{BatchJob, ExecutionStatus, ExtractionRecord, Extractor, PdfSource};

use super::{load_config, load_registry};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Root folder with one sub-folder per municipality (default from config)
    input: Option<PathBuf>,

    /// Report file (default from config)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Number of parallel workers
    #[arg(short = 'j', long)]
    jobs: Option<usize>,

    /// Extra template directory
    #[arg(long)]
    templates: Option<PathBuf>,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;
    let root = args.input.clone().unwrap_or_else(|| config.batch.input_root.clone());
    let output = args.output.clone().unwrap_or_else(|| config.batch.output.clone());
    let jobs = args.jobs.unwrap_or(config.batch.jobs).max(1);

    let batch = collect_jobs(&root, &config)?;
    if batch.is_empty() {
        anyhow::bail!("No PDF files found under {}", root.display());
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        batch.len()
    );

    let registry = load_registry(&config, args.templates.as_deref())?;
    let extractor = Arc::new(Extractor::new(
        Arc::new(registry),
        PdfSource::new(config.page.clone()),
    ));

    let pb = ProgressBar::new(batch.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let records = extract_all(extractor, batch.clone(), jobs, &pb).await?;
    pb.finish_with_message("Complete");

    let table = assemble_with(&records, &CANONICAL_COLUMNS, &config.extraction.placeholder);
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    table.write_csv(fs::File::create(&output)?)?;

    // Print summary
    let successful = records.iter().filter(|r| r.status.is_success()).count();
    let unsupported = records
        .iter()
        .filter(|r| r.status == ExecutionStatus::UnsupportedLayout)
        .count();
    let failed: Vec<_> = batch
        .iter()
        .zip(&records)
        .filter(|(_, r)| matches!(r.status, ExecutionStatus::OpenError(_)))
        .collect();

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        records.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} unsupported layout, {} failed",
        style(successful).green(),
        style(unsupported).yellow(),
        style(failed.len()).red()
    );
    println!(
        "{} Report written to {}",
        style("✓").green(),
        output.display()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for (job, record) in &failed {
            println!("  - {}: {}", job.path.display(), record.status);
        }
    }

    Ok(())
}

/// Every `root/<group>/*.pdf`, groups and files in name order.
fn collect_jobs(root: &Path, config: &NotasConfig) -> anyhow::Result<Vec<BatchJob>> {
    if !root.is_dir() {
        anyhow::bail!("Input folder not found: {}", root.display());
    }
    let root_str = root
        .to_str()
        .ok_or_else(|| anyhow::anyhow!("Input folder is not valid UTF-8: {}", root.display()))?;

    let pattern = format!("{}/*/*.pdf", Pattern::escape(root_str));
    let options = MatchOptions {
        case_sensitive: false,
        ..MatchOptions::new()
    };

    let mut jobs = Vec::new();
    for path in glob_with(&pattern, options)?.filter_map(|r| r.ok()) {
        if !path.is_file() {
            continue;
        }
        let Some(group) = path
            .parent()
            .and_then(|p| p.file_name())
            .and_then(|n| n.to_str())
        else {
            warn!("Skipping file in folder with non UTF-8 name: {}", path.display());
            continue;
        };

        let layout_key = config.batch.layout_for(group).to_string();
        debug!("{}: {} (layout '{}')", group, path.display(), layout_key);
        jobs.push(BatchJob {
            group: group.to_string(),
            layout_key,
            path,
        });
    }

    Ok(jobs)
}

/// Run at most `jobs` extractions at once; records come back in job order.
async fn extract_all(
    extractor: Arc<Extractor<PdfSource>>,
    batch: Vec<BatchJob>,
    jobs: usize,
    pb: &ProgressBar,
) -> anyhow::Result<Vec<ExtractionRecord>> {
    let semaphore = Arc::new(Semaphore::new(jobs));

    let mut handles = Vec::with_capacity(batch.len());
    for job in batch {
        let extractor = Arc::clone(&extractor);
        let semaphore = Arc::clone(&semaphore);
        let pb = pb.clone();

        handles.push(tokio::spawn(async move {
            let _permit = semaphore.acquire_owned().await?;
            let record = tokio::task::spawn_blocking(move || {
                extractor
                    .extract(&job.path, &job.layout_key)
                    .with_source_group(job.group)
            })
            .await?;
            pb.inc(1);
            Ok::<_, anyhow::Error>(record)
        }));
    }

    let mut records = Vec::with_capacity(handles.len());
    for handle in handles {
        records.push(handle.await??);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_jobs_sorted_and_mapped() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("bv")).unwrap();
        fs::create_dir_all(root.join("manaus")).unwrap();
        fs::write(root.join("bv/b.PDF"), b"").unwrap();
        fs::write(root.join("bv/a.pdf"), b"").unwrap();
        fs::write(root.join("bv/notes.txt"), b"").unwrap();
        fs::write(root.join("manaus/c.pdf"), b"").unwrap();
        fs::write(root.join("stray.pdf"), b"").unwrap();
        fs::create_dir_all(root.join("manaus/nested.pdf")).unwrap();

        let mut config = NotasConfig::default();
        config
            .batch
            .layouts
            .insert("bv".to_string(), "boa_vista".to_string());

        let jobs = collect_jobs(root, &config).unwrap();
        let names: Vec<_> = jobs
            .iter()
            .map(|j| j.path.file_name().unwrap().to_str().unwrap())
            .collect();

        assert_eq!(names, vec!["a.pdf", "b.PDF", "c.pdf"]);
        assert_eq!(jobs[0].group, "bv");
        assert_eq!(jobs[0].layout_key, "boa_vista");
        assert_eq!(jobs[2].layout_key, "manaus");
    }

    #[test]
    fn test_collect_jobs_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let config = NotasConfig::default();
        assert!(collect_jobs(&dir.path().join("absent"), &config).is_err());
    }
}
