use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use comfy_table::Table;
use printcost_core::{
    compute_costs, cost_frame, ingest_files, BillingConfig, CanonicalDataset, CostResult,
    FileInput, FileStatus,
};
use printcost_parser::{
    parse_price_table, F370Normalizer, J826Normalizer, PrintLogNormalizer, PrinterFamily,
};
use tracing::{info, warn};

use crate::files;

#[derive(Debug, Clone)]
pub struct Settings {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub config: BillingConfig,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NormalizeSummary {
    pub normalized: usize,
    pub duplicates: usize,
    pub skipped: usize,
    pub f370_rows: usize,
    pub j826_rows: usize,
}

/// Normalizes every discovered job export and appends it to the per-family datasets. With
/// `fresh`, prior datasets and the ingestion ledger are replaced instead of extended.
pub fn normalize(settings: &Settings, fresh: bool) -> Result<NormalizeSummary> {
    let ledger_path = settings.output_dir.join(files::INGESTED_LEDGER);
    let mut ledger = if fresh {
        HashSet::new()
    } else {
        files::read_ledger(&ledger_path)?
    };

    let mut summary = NormalizeSummary::default();
    let mut ledger_stale = fresh;
    for family in PrinterFamily::all() {
        let outcome = match family {
            PrinterFamily::F370 => normalize_family(&F370Normalizer, settings, &ledger, fresh)?,
            PrinterFamily::J826 => normalize_family(&J826Normalizer, settings, &ledger, fresh)?,
        };
        summary.normalized += outcome.normalized;
        summary.duplicates += outcome.duplicates;
        summary.skipped += outcome.skipped;
        match family {
            PrinterFamily::F370 => summary.f370_rows = outcome.rows,
            PrinterFamily::J826 => summary.j826_rows = outcome.rows,
        }

        // Every row already on disk has its source hash in the ledger.
        ledger_stale |= !outcome.new_hashes.is_empty();
        ledger.extend(outcome.new_hashes);
        if ledger_stale {
            files::write_ledger(&ledger_path, &ledger)?;
            ledger_stale = false;
        }
    }

    Ok(summary)
}

struct FamilyOutcome {
    normalized: usize,
    duplicates: usize,
    skipped: usize,
    rows: usize,
    new_hashes: Vec<String>,
}

fn normalize_family<N: PrintLogNormalizer>(
    normalizer: &N,
    settings: &Settings,
    ledger: &HashSet<String>,
    fresh: bool,
) -> Result<FamilyOutcome> {
    let family = normalizer.family();
    let sources = files::discover_sources(&settings.input_dir, family)?;

    let mut unreadable = 0;
    let mut loaded: Vec<(String, Vec<u8>)> = Vec::with_capacity(sources.len());
    for path in &sources {
        match fs::read(path) {
            Ok(contents) => loaded.push((path.display().to_string(), contents)),
            Err(err) => {
                warn!(path = %path.display(), "Skipping unreadable file: {err}");
                unreadable += 1;
            }
        }
    }
    let inputs: Vec<FileInput<'_>> = loaded
        .iter()
        .map(|(path, contents)| FileInput {
            path: path.as_str(),
            contents: contents.as_slice(),
        })
        .collect();

    let batch = ingest_files(normalizer, &inputs, ledger);

    let dataset_path = settings.output_dir.join(files::dataset_file(family));
    let prior = if !fresh && dataset_path.exists() {
        Some(files::read_dataset(&dataset_path)?)
    } else {
        None
    };
    let first_batch = prior.is_none();
    let mut dataset = CanonicalDataset::start(family, prior, first_batch)
        .with_context(|| format!("existing {} is not a {family} dataset", dataset_path.display()))?;
    dataset.extend(&batch.records)?;

    let rows = dataset.height();
    if dataset.is_empty() && !dataset_path.exists() {
        warn!(%family, "No valid files processed; no dataset written");
    } else {
        if dataset.is_empty() {
            warn!(%family, path = %dataset_path.display(), "No valid files processed; clearing dataset");
        }
        let mut df = dataset.finish();
        files::write_dataset(&dataset_path, &mut df)?;
        info!(%family, rows, path = %dataset_path.display(), "Wrote canonical dataset");
    }

    Ok(FamilyOutcome {
        normalized: batch.count(FileStatus::Normalized),
        duplicates: batch.count(FileStatus::Duplicate),
        skipped: batch.count(FileStatus::Skipped) + unreadable,
        rows,
        new_hashes: batch.new_hashes,
    })
}

/// Prices both canonical datasets and writes the per-job cost table.
pub fn cost(settings: &Settings, price_file: &Path) -> Result<Vec<CostResult>> {
    let f370_path = settings.output_dir.join(files::F370_DATASET);
    let j826_path = settings.output_dir.join(files::J826_DATASET);
    let f370 = files::read_dataset(&f370_path).context("F370 canonical dataset is required")?;
    let j826 = files::read_dataset(&j826_path).context("J826 canonical dataset is required")?;

    let price_text = fs::read_to_string(price_file)
        .with_context(|| format!("failed to read price table {}", price_file.display()))?;
    let prices = parse_price_table(price_text.lines());
    info!(entries = prices.len(), "Parsed material price table");

    let results = compute_costs(&f370, &j826, &prices, &settings.config.flat_fees)?;

    let costs_path = settings.output_dir.join(files::COSTS_FILE);
    let mut df = cost_frame(&results)?;
    files::write_dataset(&costs_path, &mut df)?;
    info!(jobs = results.len(), path = %costs_path.display(), "Wrote job costs");

    Ok(results)
}

pub fn cost_table(results: &[CostResult]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        "Print Job",
        "Printer Type",
        "Filament Fee",
        "Flat Fee",
        "Total Fee",
        "Company Name",
    ]);
    for result in results {
        table.add_row(vec![
            result.job_id.to_string(),
            result.printer_family.to_string(),
            format!("{:.2}", result.filament_fee),
            format!("{:.2}", result.flat_fee),
            format!("{:.2}", result.total_fee),
            result.company_name.clone(),
        ]);
    }
    let total: f64 = results.iter().map(|r| r.total_fee).sum();
    table.add_row(vec![
        String::new(),
        String::new(),
        String::new(),
        "Total".to_string(),
        format!("{total:.2}"),
        String::new(),
    ]);
    table
}
