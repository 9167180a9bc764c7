use crate::errors::NormalizeError;
use crate::model::{CanonicalRecord, NormalizedLog, PrinterFamily, RawTable};

pub trait PrintLogNormalizer {
    type Record: CanonicalRecord;

    fn name(&self) -> &'static str;

    fn family(&self) -> PrinterFamily {
        Self::Record::FAMILY
    }

    /// Whether the first CSV row of a source holds column names.
    fn has_header_row(&self) -> bool;

    fn normalize(&self, table: &RawTable) -> Result<NormalizedLog<Self::Record>, NormalizeError>;
}

/// Reads `content` as CSV in the shape the normalizer expects and normalizes it.
pub fn normalize_content<N: PrintLogNormalizer + ?Sized>(
    normalizer: &N,
    source_name: &str,
    content: &str,
) -> Result<NormalizedLog<N::Record>, NormalizeError> {
    let table = RawTable::from_csv(source_name, content, normalizer.has_header_row()).map_err(
        |err| NormalizeError::Csv {
            normalizer: normalizer.name(),
            source_name: source_name.to_string(),
            source: err,
        },
    )?;
    normalizer.normalize(&table)
}
