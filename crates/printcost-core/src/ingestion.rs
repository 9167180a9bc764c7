use std::collections::HashSet;

use blake3::Hasher;
use printcost_parser::{normalize_content, PrintLogNormalizer};
use tracing::{info, warn};

#[derive(Debug)]
pub struct FileInput<'a> {
    pub path: &'a str,
    pub contents: &'a [u8],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    Duplicate,
    Normalized,
    Skipped,
}

#[derive(Debug)]
pub struct FileReport {
    pub path: String,
    pub hash: String,
    pub status: FileStatus,
    pub records: usize,
    /// Skip reason for `Skipped`, non-fatal normalization warnings otherwise.
    pub messages: Vec<String>,
}

#[derive(Debug)]
pub struct IngestionBatch<R> {
    pub records: Vec<R>,
    pub reports: Vec<FileReport>,
    pub new_hashes: Vec<String>,
}

impl<R> IngestionBatch<R> {
    pub fn count(&self, status: FileStatus) -> usize {
        self.reports
            .iter()
            .filter(|report| report.status == status)
            .count()
    }
}

/// Normalizes each input in order. Inputs whose content hash is in `existing_hashes` are
/// reported as duplicates; inputs the normalizer rejects are reported and skipped.
pub fn ingest_files<N: PrintLogNormalizer>(
    normalizer: &N,
    inputs: &[FileInput<'_>],
    existing_hashes: &HashSet<String>,
) -> IngestionBatch<N::Record> {
    let mut records = Vec::new();
    let mut reports = Vec::new();
    let mut new_hashes = Vec::new();

    for input in inputs {
        let hash = compute_hash(input.contents);
        if existing_hashes.contains(&hash) {
            info!(path = input.path, "Skipping previously ingested file");
            reports.push(FileReport {
                path: input.path.to_string(),
                hash,
                status: FileStatus::Duplicate,
                records: 0,
                messages: Vec::new(),
            });
            continue;
        }

        let Ok(content_str) = std::str::from_utf8(input.contents) else {
            warn!(path = input.path, "Skipping file: contents were not valid UTF-8");
            reports.push(FileReport {
                path: input.path.to_string(),
                hash,
                status: FileStatus::Skipped,
                records: 0,
                messages: vec!["file contents were not valid UTF-8".to_string()],
            });
            continue;
        };

        match normalize_content(normalizer, input.path, content_str) {
            Ok(log) => {
                for warning in &log.warnings {
                    warn!(path = input.path, normalizer = normalizer.name(), "{warning}");
                }
                info!(
                    path = input.path,
                    normalizer = normalizer.name(),
                    records = log.records.len(),
                    "Normalized file"
                );
                new_hashes.push(hash.clone());
                reports.push(FileReport {
                    path: input.path.to_string(),
                    hash,
                    status: FileStatus::Normalized,
                    records: log.records.len(),
                    messages: log.warnings,
                });
                records.extend(log.records);
            }
            Err(err) => {
                warn!(path = input.path, normalizer = err.normalizer(), "Skipping file: {err}");
                reports.push(FileReport {
                    path: input.path.to_string(),
                    hash,
                    status: FileStatus::Skipped,
                    records: 0,
                    messages: vec![err.to_string()],
                });
            }
        }
    }

    IngestionBatch {
        records,
        reports,
        new_hashes,
    }
}

pub fn compute_hash(contents: &[u8]) -> String {
    let mut hasher = Hasher::new();
    hasher.update(contents);
    let hash = hasher.finalize();
    hash.to_hex().to_string()
}
