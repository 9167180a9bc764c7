use std::collections::HashSet;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use polars::prelude::*;
use printcost_parser::PrinterFamily;

pub const F370_DATASET: &str = "Appended_Print_F370.csv";
pub const J826_DATASET: &str = "Appended_Print_J826.csv";
pub const COSTS_FILE: &str = "Print_Job_Costs.csv";
pub const INGESTED_LEDGER: &str = ".printcost_ingested";
const GENERATED_PREFIX: &str = "Appended_";

pub fn dataset_file(family: PrinterFamily) -> &'static str {
    match family {
        PrinterFamily::F370 => F370_DATASET,
        PrinterFamily::J826 => J826_DATASET,
    }
}

fn source_pattern(family: PrinterFamily) -> &'static str {
    match family {
        PrinterFamily::F370 => "*_Print_F370*.csv",
        PrinterFamily::J826 => "*Print_J826*.csv",
    }
}

/// Job exports of `family` in `dir`, sorted by path, excluding generated datasets.
pub fn discover_sources(dir: &Path, family: PrinterFamily) -> Result<Vec<PathBuf>> {
    let pattern = dir.join(source_pattern(family));
    let pattern_str = pattern
        .to_str()
        .with_context(|| format!("input path {} is not valid UTF-8", dir.display()))?;

    let mut paths = Vec::new();
    for entry in glob::glob(pattern_str)? {
        let path = entry?;
        let generated = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.starts_with(GENERATED_PREFIX));
        if path.is_file() && !generated {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

/// Reads a CSV dataset with every column as text; callers cast to the shape they need.
pub fn read_dataset(path: &Path) -> Result<DataFrame> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .with_context(|| format!("failed to open {}", path.display()))?
        .finish()
        .with_context(|| format!("failed to read {}", path.display()))?;
    Ok(df)
}

pub fn write_dataset(path: &Path, df: &mut DataFrame) -> Result<()> {
    let mut file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(df)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

/// Content hashes of files ingested by earlier runs, one per line.
pub fn read_ledger(path: &Path) -> Result<HashSet<String>> {
    if !path.exists() {
        return Ok(HashSet::new());
    }
    let contents =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    Ok(contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

pub fn write_ledger(path: &Path, hashes: &HashSet<String>) -> Result<()> {
    let mut sorted: Vec<&String> = hashes.iter().collect();
    sorted.sort();
    let mut contents = String::new();
    for hash in sorted {
        contents.push_str(hash);
        contents.push('\n');
    }
    fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))
}
