use crate::errors::NormalizeError;
use crate::model::{F370Record, NormalizedLog, RawRecord, RawTable};
use crate::registry::PrintLogNormalizer;

use super::common::{find_matching_field, lenient_f64, optional_f64};

const COMPANY_KEYWORDS: &[&str] = &["Company", "CompanyName"];
const PRINT_TIME_KEYWORDS: &[&str] = &["Print Time", "h:mm"];
const SUPPORT_KEYWORDS: &[&str] = &["Support", "QSR"];
const ABS_KEYWORDS: &[&str] = &["ABS"];
const TPU_KEYWORDS: &[&str] = &["TPU"];

/// Column positions resolved against one source header.
#[derive(Debug, Clone, Copy)]
struct F370Columns {
    company: usize,
    print_time: usize,
    support: usize,
    abs: Option<usize>,
    tpu: Option<usize>,
}

/// Normalizes F370 job exports: one header row, one job per data row, column names that
/// drift between firmware versions.
#[derive(Debug, Default, Clone, Copy)]
pub struct F370Normalizer;

impl F370Normalizer {
    const NAME: &'static str = "F370";

    /// Absent material columns and blank cells both read as 0.0.
    fn material_grams(record: &RawRecord<'_>, column: Option<usize>) -> f64 {
        column
            .and_then(|idx| record.get(idx))
            .map(lenient_f64)
            .unwrap_or(0.0)
    }

    fn resolve_columns(table: &RawTable) -> Result<F370Columns, NormalizeError> {
        let fields = &table.fields;

        let company = find_matching_field(fields, COMPANY_KEYWORDS).ok_or_else(|| {
            NormalizeError::MissingIdentifier {
                normalizer: Self::NAME,
                source_name: table.source_name.clone(),
            }
        })?;

        let print_time = find_matching_field(fields, PRINT_TIME_KEYWORDS);
        let support = find_matching_field(fields, SUPPORT_KEYWORDS);

        let (Some(print_time), Some(support)) = (print_time, support) else {
            let mut missing = Vec::new();
            if print_time.is_none() {
                missing.push("print time");
            }
            if support.is_none() {
                missing.push("support");
            }
            return Err(NormalizeError::MissingCriticalFields {
                normalizer: Self::NAME,
                source_name: table.source_name.clone(),
                missing,
                detected: fields.clone(),
            });
        };

        Ok(F370Columns {
            company,
            print_time,
            support,
            abs: find_matching_field(fields, ABS_KEYWORDS),
            tpu: find_matching_field(fields, TPU_KEYWORDS),
        })
    }
}

impl PrintLogNormalizer for F370Normalizer {
    type Record = F370Record;

    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn has_header_row(&self) -> bool {
        true
    }

    fn normalize(&self, table: &RawTable) -> Result<NormalizedLog<F370Record>, NormalizeError> {
        let columns = Self::resolve_columns(table)?;

        let records = table
            .records()
            .map(|record| F370Record {
                print_time: record.get(columns.print_time).unwrap_or_default().to_string(),
                abs_grams: Self::material_grams(&record, columns.abs),
                tpu_grams: Self::material_grams(&record, columns.tpu),
                support_volume: record.get(columns.support).and_then(optional_f64),
                company_name: record.get(columns.company).unwrap_or_default().to_string(),
            })
            .collect();

        Ok(NormalizedLog::new(records))
    }
}
