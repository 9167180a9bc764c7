use std::collections::HashMap;

use crate::errors::NormalizeError;
use crate::model::{J826Record, NormalizedLog, RawTable};
use crate::registry::PrintLogNormalizer;

use super::common::{format_print_time, non_negative_f64};

/// Row (0-indexed) of the first column that carries the company name.
const COMPANY_ROW: usize = 14;
const UNKNOWN_COMPANY: &str = "Unknown Company";

const PRINT_TIME_LABEL: &str = "Print Time";
const DRAFT_GREY_LABEL: &str = "DraftGrey (g)";
const VERO_ULTRA_WHITE_LABEL: &str = "VeroUltraWhite (g)";
const VERO_BLACK_PLUS_LABEL: &str = "VeroBlackPlus (g)";
const SUP706_LABEL: &str = "SUP706 (g)";

/// Normalizes J826 job reports, where the first column alternates label and value lines.
/// Each report describes a single job.
#[derive(Debug, Default, Clone, Copy)]
pub struct J826Normalizer;

impl J826Normalizer {
    const NAME: &'static str = "J826";

    /// Pairs even rows (labels) with the following odd rows (values).
    fn pair_labels<'a>(cells: &[Option<&'a str>]) -> HashMap<&'a str, &'a str> {
        cells
            .chunks_exact(2)
            .map(|pair| (pair[0].unwrap_or_default(), pair[1].unwrap_or_default()))
            .collect()
    }

    fn labelled_number(pairs: &HashMap<&str, &str>, label: &str) -> f64 {
        non_negative_f64(pairs.get(label).copied().unwrap_or("0"))
    }
}

impl PrintLogNormalizer for J826Normalizer {
    type Record = J826Record;

    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn has_header_row(&self) -> bool {
        false
    }

    fn normalize(&self, table: &RawTable) -> Result<NormalizedLog<J826Record>, NormalizeError> {
        if table.is_empty() {
            return Err(NormalizeError::EmptyInput {
                normalizer: Self::NAME,
                source_name: table.source_name.clone(),
            });
        }

        let cells = table.column_cells(0);
        let pairs = Self::pair_labels(&cells);

        let mut missing_company_row = None;
        let company_name = match cells.get(COMPANY_ROW) {
            Some(cell) => Some(cell.unwrap_or_default().trim())
                .filter(|name| !name.is_empty())
                .unwrap_or(UNKNOWN_COMPANY)
                .to_string(),
            None => {
                missing_company_row = Some(format!(
                    "row {} is missing in {}; assigning '{UNKNOWN_COMPANY}'",
                    COMPANY_ROW + 1,
                    table.source_name
                ));
                UNKNOWN_COMPANY.to_string()
            }
        };

        let print_time = pairs.get(PRINT_TIME_LABEL).copied().unwrap_or("0h 0m");

        let record = J826Record {
            print_time_hm: format_print_time(print_time),
            draft_grey_g: Self::labelled_number(&pairs, DRAFT_GREY_LABEL),
            vero_ultra_white_g: Self::labelled_number(&pairs, VERO_ULTRA_WHITE_LABEL),
            vero_black_plus_g: Self::labelled_number(&pairs, VERO_BLACK_PLUS_LABEL),
            sup706_g: Self::labelled_number(&pairs, SUP706_LABEL),
            company_name,
        };

        let log = NormalizedLog::new(vec![record]);
        Ok(match missing_company_row {
            Some(warning) => log.with_warning(warning),
            None => log,
        })
    }
}
